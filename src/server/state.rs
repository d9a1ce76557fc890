//! Application State
//!
//! Shared state accessible by all handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::server::error::{ServerError, ServerResult};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Pooled client used for every upstream request
    pub client: Client,
    /// Server configuration
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state with an upstream client honouring the proxy timeout
    pub fn new(config: Config) -> ServerResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.proxy.request_timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ServerError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: Arc::new(config),
            start_time: Instant::now(),
        })
    }

    /// Charting backend origin without a trailing slash
    pub fn backend_origin(&self) -> &str {
        self.config.proxy.origin()
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
