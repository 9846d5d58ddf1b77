//! Full-text series search endpoint.

use crate::api::series::SeriesInfoWire;
use crate::error::FredResult;
use crate::transport::HttpTransport;
use fred_core::SeriesInfo;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    seriess: Vec<SeriesInfoWire>,
}

/// Search series by keywords, ranked by the requested ordering.
pub(crate) async fn series(
    transport: &HttpTransport,
    text: &str,
    limit: u32,
    order_by: Option<&str>,
) -> FredResult<Vec<SeriesInfo>> {
    let mut params = vec![
        ("search_text", text.to_string()),
        ("limit", limit.to_string()),
    ];
    if let Some(order_by) = order_by {
        params.push(("order_by", order_by.to_string()));
    }

    let response: SearchResponse = transport.get("series/search", &params).await?;
    Ok(response.seriess.into_iter().map(SeriesInfo::from).collect())
}
