//! Lorikeet Dashboard Dev Server
//!
//! Serves the bundled front-end and reverse-proxies chart requests, built
//! with Axum.
//!
//! # Endpoints
//!
//! ## Charts (proxied to the charting backend)
//! - `ANY /charts` - Chart name listing
//! - `ANY /charts/{name}.svg` - Rendered chart image
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Status including backend reachability
//!
//! ## Front-end
//! - `GET /*` - Files from the dist directory, `index.html` for anything else
//!
//! # Example
//!
//! ```rust,ignore
//! use lorikeet_dash::config::Config;
//! use lorikeet_dash::server::{serve, AppState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(Config::from_env())?;
//!     serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let chart_routes = Router::new()
        .route("/charts", any(routes::proxy::proxy_charts))
        .route("/charts/", any(routes::proxy::proxy_charts))
        .route("/charts/*path", any(routes::proxy::proxy_charts));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let assets = &state.config.assets;
    let front = ServeDir::new(&assets.dist_dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(assets.index_file()));

    let cors = cors_layer(&state.config.server.cors_origins);

    let shared_state = Arc::new(state);

    let router = Router::new()
        .merge(chart_routes)
        .nest("/health", health_routes)
        .fallback_service(front)
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state);

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// CORS layer for the configured origins, if any
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin `{}`", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

/// Start the dev server
pub async fn serve(state: AppState) -> Result<(), ServerError> {
    let addr = state.config.server.addr();
    let backend = state.backend_origin().to_string();
    let dist_dir = state.config.assets.dist_dir.clone();

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    if !dist_dir.join("index.html").exists() {
        tracing::warn!(
            "No index.html in {:?}; build the front-end with `trunk build` first",
            dist_dir
        );
    }

    tracing::info!("Proxying /charts to {}", backend);
    tracing::info!("Connect on: http://{}/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Dev server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode, Uri},
        response::IntoResponse,
        Json,
    };
    use std::path::Path;
    use tempfile::tempdir;
    use tower::util::ServiceExt;

    /// Stand-in for the charting backend on an ephemeral port
    async fn spawn_backend() -> String {
        async fn render(uri: Uri) -> impl IntoResponse {
            (
                [(header::CONTENT_TYPE, "image/svg+xml")],
                format!("<svg><!-- {} --></svg>", uri),
            )
        }

        let app = Router::new()
            .route("/charts", get(|| async { Json(vec!["a", "b", "c"]) }))
            .route("/charts/:file", get(render));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn create_test_app(backend_url: &str, dist_dir: &Path) -> Router {
        let mut config = Config::default();
        config.proxy.backend_url = backend_url.to_string();
        config.proxy.request_timeout_secs = 5;
        config.assets.dist_dir = dist_dir.to_path_buf();

        build_router(AppState::new(config).unwrap())
    }

    fn create_dist() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>Lorikeet Dashboard</html>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('dash');").unwrap();
        dir
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_proxy_chart_listing() {
        let backend = spawn_backend().await;
        let dist = create_dist();
        let app = create_test_app(&backend, dist.path());

        let (status, body) = get_body(app, "/charts").await;

        assert_eq!(status, StatusCode::OK);
        let names: Vec<String> = serde_json::from_str(&body).unwrap();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_proxy_chart_image_verbatim() {
        let backend = spawn_backend().await;
        let dist = create_dist();
        let app = create_test_app(&backend, dist.path());

        let uri = "/charts/cpu%20load.svg?height=310&width=600&offset=50&date=1700000000000";
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/svg+xml"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(bytes.to_vec()).unwrap(),
            format!("<svg><!-- {} --></svg>", uri)
        );
    }

    #[tokio::test]
    async fn test_proxy_relays_backend_status() {
        let backend = spawn_backend().await;
        let dist = create_dist();
        let app = create_test_app(&backend, dist.path());

        let (status, _) = get_body(app, "/charts/nested/unknown.svg").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_proxy_backend_down() {
        let dist = create_dist();
        let app = create_test_app("http://127.0.0.1:1", dist.path());

        let (status, body) = get_body(app, "/charts").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"]["code"], "BAD_GATEWAY");
        assert!(json["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_front_end_index() {
        let dist = create_dist();
        let app = create_test_app("http://127.0.0.1:1", dist.path());

        let (status, body) = get_body(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<html>Lorikeet Dashboard</html>");
    }

    #[tokio::test]
    async fn test_front_end_asset() {
        let dist = create_dist();
        let app = create_test_app("http://127.0.0.1:1", dist.path());

        let (status, body) = get_body(app, "/app.js").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "console.log('dash');");
    }

    #[tokio::test]
    async fn test_front_end_falls_back_to_index() {
        let dist = create_dist();
        let app = create_test_app("http://127.0.0.1:1", dist.path());

        let (status, body) = get_body(app, "/some/client/route").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<html>Lorikeet Dashboard</html>");
    }

    #[tokio::test]
    async fn test_health_live() {
        let dist = create_dist();
        let app = create_test_app("http://127.0.0.1:1", dist.path());

        let (status, _) = get_body(app, "/health/live").await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_reports_backend() {
        let backend = spawn_backend().await;
        let dist = create_dist();

        let (_, body) = get_body(create_test_app(&backend, dist.path()), "/health").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["backend"], "ok");

        let (_, body) = get_body(create_test_app("http://127.0.0.1:1", dist.path()), "/health").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["backend"], "unreachable");
    }

    #[test]
    fn test_cors_layer_only_with_origins() {
        assert!(cors_layer(&[]).is_none());
        assert!(cors_layer(&["http://localhost:8080".to_string()]).is_some());
    }
}
