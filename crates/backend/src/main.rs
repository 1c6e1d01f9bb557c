use anyhow::Context;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use backend::shared::config;
use backend::{routes, system, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load_config().context("Failed to load configuration")?;

    let log_dir = config::resolve_path(&config.logging.dir);
    system::tracing::initialize(&log_dir)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server host/port")?;

    let state = AppState::initialize(config).await?;
    let app = routes::build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Tailor shop backend listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
