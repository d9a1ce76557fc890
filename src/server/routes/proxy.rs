//! Chart Proxy Routes
//!
//! Forwards everything under `/charts` to the charting backend.
//!
//! - ANY /charts - Chart name listing
//! - ANY /charts/{name}.svg - Rendered chart image

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::Response,
};
use std::sync::Arc;

use crate::server::error::{ServerError, ServerResult};
use crate::server::state::AppState;

/// Headers that describe a single connection and never cross the proxy
const HOP_BY_HOP: [&str; 10] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

/// ANY /charts, ANY /charts/*
///
/// Relays the request to the backend with its path and query untouched and
/// returns the backend's status, headers and body.
pub async fn proxy_charts(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<Response> {
    let url = upstream_url(state.backend_origin(), &uri);

    let upstream_method = reqwest::Method::from_bytes(method.as_str().as_bytes())
        .map_err(|e| ServerError::InvalidUpstream(e.to_string()))?;

    let upstream = state
        .client
        .request(upstream_method, &url)
        .headers(forward_request_headers(&headers))
        .body(body)
        .send()
        .await?;

    let status = StatusCode::from_u16(upstream.status().as_u16())
        .map_err(|e| ServerError::Internal(e.to_string()))?;
    let response_headers = forward_response_headers(upstream.headers());
    let bytes = upstream.bytes().await?;

    tracing::debug!(
        method = %method,
        path = %uri.path(),
        chart = ?chart_name(uri.path()),
        status = status.as_u16(),
        bytes = bytes.len(),
        "Proxied chart request"
    );

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;

    Ok(response)
}

/// Backend URL for an incoming request: origin + original path and query
pub fn upstream_url(origin: &str, uri: &Uri) -> String {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    format!("{}{}", origin.trim_end_matches('/'), path_and_query)
}

/// Decoded chart name for `/charts/{name}.svg` paths
pub fn chart_name(path: &str) -> Option<String> {
    let file = path.strip_prefix("/charts/")?;
    let encoded = file.strip_suffix(".svg").unwrap_or(file);

    urlencoding::decode(encoded).ok().map(|name| name.into_owned())
}

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| name.eq_ignore_ascii_case(h))
}

fn forward_request_headers(headers: &HeaderMap) -> reqwest::header::HeaderMap {
    let mut forwarded = reqwest::header::HeaderMap::new();

    for (name, value) in headers {
        if is_hop_by_hop(name.as_str()) {
            continue;
        }

        let name = reqwest::header::HeaderName::from_bytes(name.as_str().as_bytes());
        let value = reqwest::header::HeaderValue::from_bytes(value.as_bytes());
        if let (Ok(name), Ok(value)) = (name, value) {
            forwarded.append(name, value);
        }
    }

    forwarded
}

fn forward_response_headers(headers: &reqwest::header::HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::new();

    for (name, value) in headers {
        if is_hop_by_hop(name.as_str()) {
            continue;
        }

        let name = HeaderName::from_bytes(name.as_str().as_bytes());
        let value = HeaderValue::from_bytes(value.as_bytes());
        if let (Ok(name), Ok(value)) = (name, value) {
            forwarded.append(name, value);
        }
    }

    forwarded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_url_keeps_query() {
        let uri: Uri = "/charts/cpu%20load.svg?height=310&width=600&offset=50&date=1700000000000"
            .parse()
            .unwrap();

        assert_eq!(
            upstream_url("http://localhost:3333/", &uri),
            "http://localhost:3333/charts/cpu%20load.svg?height=310&width=600&offset=50&date=1700000000000"
        );
    }

    #[test]
    fn test_upstream_url_listing() {
        let uri: Uri = "/charts".parse().unwrap();
        assert_eq!(upstream_url("http://backend:3333", &uri), "http://backend:3333/charts");
    }

    #[test]
    fn test_chart_name() {
        assert_eq!(chart_name("/charts/cpu%20load.svg").as_deref(), Some("cpu load"));
        assert_eq!(chart_name("/charts/a%2Fb%3Fc.svg").as_deref(), Some("a/b?c"));
        assert_eq!(chart_name("/charts"), None);
    }

    #[test]
    fn test_hop_by_hop_headers_dropped() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("localhost:3000"));
        headers.insert("Connection", HeaderValue::from_static("keep-alive"));
        headers.insert("accept", HeaderValue::from_static("image/svg+xml"));
        headers.insert("x-request-id", HeaderValue::from_static("abc"));

        let forwarded = forward_request_headers(&headers);

        assert_eq!(forwarded.len(), 2);
        assert!(forwarded.get("host").is_none());
        assert!(forwarded.get("connection").is_none());
        assert_eq!(forwarded.get("accept").unwrap(), "image/svg+xml");
    }
}
