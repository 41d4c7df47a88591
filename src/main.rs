use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hive_gateway::{app, cli::Cli, config::GatewayConfig, types::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up BACKEND_API_URL, PROTECTION_BYPASS_TOKEN, etc.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = cli.apply(GatewayConfig::from_env()?)?;

    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    tracing::info!(
        environment = ?config.environment,
        backend = %config.backend.base_url,
        calendar = %config.backend.calendar_url,
        debug = config.debug,
        "Starting Hive gateway"
    );

    let port = config.server.port;
    let state = AppState::new(config)?;

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Hive gateway listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
