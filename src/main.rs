//! Lorikeet Dashboard dev server
//!
//! Run with: cargo run -- --backend http://localhost:3333
//!
//! # Configuration
//!
//! Settings come from (later wins): built-in defaults, the config file,
//! environment variables, command-line flags.
//!
//! Environment variables:
//! - `PORT`: Port to listen on (default: 3000)
//! - `LORIKEET_DASH_HOST`: Host to bind to (default: 0.0.0.0)
//! - `LORIKEET_DASH_BACKEND_URL`: Charting backend (default: http://localhost:3333)
//! - `LORIKEET_DASH_DIST_DIR`: Front-end build output (default: lorikeet-dash-ui/dist)
//! - `LORIKEET_DASH_LOG_LEVEL` / `LORIKEET_DASH_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Full tracing filter, overrides the log level

use anyhow::Context;
use clap::Parser;
use lorikeet_dash::{generate_default_config, serve, AppState, Config, LogFormat, LoggingConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lorikeet-dash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Development server for the Lorikeet Dashboard")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Charting backend origin
    #[arg(short, long)]
    backend: Option<String>,

    /// Directory holding the built front-end
    #[arg(short, long)]
    dist: Option<PathBuf>,

    /// Print the default configuration file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading configuration from {:?}", path))?,
        None => Config::load_default(),
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(backend) = cli.backend {
        config.proxy.backend_url = backend;
    }
    if let Some(dist) = cli.dist {
        config.assets.dist_dir = dist;
    }

    init_tracing(&config.logging);

    tracing::info!("Starting Lorikeet Dashboard dev server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Serving front-end from {:?}", config.assets.dist_dir);

    let state = AppState::new(config)?;
    serve(state).await?;

    Ok(())
}

/// Initialize tracing from the logging config; `RUST_LOG` takes precedence
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("lorikeet_dash={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
