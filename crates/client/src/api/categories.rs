//! Category listing endpoint.

use crate::api::series::SeriesInfoWire;
use crate::error::FredResult;
use crate::transport::HttpTransport;
use fred_core::SeriesInfo;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CategorySeriesResponse {
    #[serde(default)]
    seriess: Vec<SeriesInfoWire>,
}

/// List the series filed under a category, paginated.
pub(crate) async fn series(
    transport: &HttpTransport,
    category_id: i64,
    limit: u32,
    offset: u32,
) -> FredResult<Vec<SeriesInfo>> {
    let params = vec![
        ("category_id", category_id.to_string()),
        ("limit", limit.to_string()),
        ("offset", offset.to_string()),
    ];

    let response: CategorySeriesResponse = transport.get("category/series", &params).await?;
    Ok(response.seriess.into_iter().map(SeriesInfo::from).collect())
}
