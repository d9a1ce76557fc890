//! # Lorikeet Dashboard dev server
//!
//! Serves the Leptos front-end of the Lorikeet Dashboard and forwards chart
//! requests to the charting backend, so the browser sees a single origin.
//!
//! ## Modules
//!
//! - [`config`]: TOML + environment configuration
//! - [`server`]: Axum router, chart proxy, health probes and static assets
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lorikeet_dash::{serve, AppState, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::from_env();
//!     config.proxy.backend_url = "http://localhost:3333".to_string();
//!
//!     serve(AppState::new(config)?).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod server;

pub use config::{
    generate_default_config, AssetsConfig, Config, ConfigError, LogFormat, LoggingConfig,
    ProxyConfig, ServerConfig,
};

pub use server::{build_router, serve, AppState, ServerError, ServerResult};
