//! Release listing endpoint.

use crate::error::FredResult;
use crate::transport::HttpTransport;
use fred_core::Release;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ReleasesResponse {
    #[serde(default)]
    releases: Vec<ReleaseWire>,
}

#[derive(Debug, Deserialize)]
struct ReleaseWire {
    id: i64,
    name: String,
    #[serde(default)]
    press_release: bool,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    realtime_start: Option<String>,
    #[serde(default)]
    realtime_end: Option<String>,
}

impl From<ReleaseWire> for Release {
    fn from(wire: ReleaseWire) -> Self {
        Release {
            id: wire.id,
            name: wire.name,
            press_release: wire.press_release,
            link: wire.link,
            realtime_start: wire.realtime_start,
            realtime_end: wire.realtime_end,
        }
    }
}

/// List economic data releases, paginated.
pub(crate) async fn list(
    transport: &HttpTransport,
    limit: u32,
    offset: u32,
) -> FredResult<Vec<Release>> {
    let params = vec![("limit", limit.to_string()), ("offset", offset.to_string())];

    let response: ReleasesResponse = transport.get("releases", &params).await?;
    Ok(response.releases.into_iter().map(Release::from).collect())
}
