//! HTTP API Client
//!
//! Talks to the charting backend through the dev server's `/charts` proxy.

use gloo_net::http::Request;

/// Chart listing endpoint (same origin as the page)
pub const CHARTS_ENDPOINT: &str = "/charts";

/// Fixed `offset` query value expected by the charting backend
pub const CHART_OFFSET: u32 = 50;

/// Fetch the names of all charts the backend can render
pub async fn fetch_charts() -> Result<Vec<String>, String> {
    let response = Request::get(CHARTS_ENDPOINT)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(format!(
            "Chart list request failed: {} {}",
            response.status(),
            response.status_text()
        ));
    }

    response
        .json::<Vec<String>>()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

/// Percent-encode a chart name for use as a path segment
pub fn encode_chart_name(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}

/// One rendered-image request for a chart at a measured size
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Milliseconds since the epoch; only busts caches
    pub timestamp: i64,
}

impl ChartImage {
    /// Image for a container of the given client size, if it has been laid out
    pub fn measured(name: &str, width: i32, height: i32, timestamp: i64) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            width: width as u32,
            height: height as u32,
            timestamp,
        })
    }

    /// `/charts/{name}.svg?height=..&width=..&offset=50&date=..`
    pub fn url(&self) -> String {
        format!(
            "{}/{}.svg?height={}&width={}&offset={}&date={}",
            CHARTS_ENDPOINT,
            encode_chart_name(&self.name),
            self.height,
            self.width,
            CHART_OFFSET,
            self.timestamp
        )
    }
}
