pub mod config;
pub mod core_state;
pub mod db;
pub mod doctors;
pub mod models;
pub mod reports;
pub mod specialties;
pub mod theme;
pub mod users;
pub mod web;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Startup failures surfaced by [`run`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] core_state::CoreError),
    #[error(transparent)]
    Server(#[from] web::server::ServerError),
    #[error("Signal handler error: {0}")]
    Signal(#[from] std::io::Error),
}

/// Start the dashboard and serve until Ctrl-C.
pub async fn run() -> Result<(), AppError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let server_config = config::ServerConfig::from_env();
    let core = Arc::new(core_state::CoreState::from_config()?);
    let mut server = web::start_server(core, server_config.bind).await?;
    tracing::info!(addr = %server.addr, "Dashboard available at http://{}", server.addr);

    tokio::signal::ctrl_c().await?;
    server.shutdown();
    server.stopped().await;
    Ok(())
}
