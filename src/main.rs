use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use identity_hub::{
    args::Args,
    config::Config,
    db_persistence::DbPersistence,
    errors::{AppError, AppResult},
    http_server::{self, AppState},
};

#[tokio::main]
async fn main() -> AppResult<()> {
    let args = Args::parse();

    // Load configuration from --config path (defaults to config/default.toml)
    let mut config = Config::load(&args.config).map_err(AppError::Config)?;

    // Apply CLI overrides
    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_logging(&config.logging.level)?;

    info!("🚀 Starting IdentityHub v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", args.config);

    let db = Arc::new(DbPersistence::new(config.get_database_url()).await?);
    info!("Database ready");

    let server_address = config.get_server_address();
    let state = AppState::new(db, Arc::new(config));

    info!("HTTP API available at: http://{}", server_address);
    http_server::start_server(state, &server_address)
        .await
        .map_err(|e| AppError::Server(e.to_string()))
}

fn init_logging(level: &str) -> AppResult<()> {
    let log_level = match level.to_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "warn" => tracing::Level::WARN,
        "info" => tracing::Level::INFO,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => {
            eprintln!("Invalid log level: {}, defaulting to info", level);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("identity_hub={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    Ok(())
}
