use anyhow::{Context, Result};
use clap::Parser;
use tandem_relay::{RelayConfig, SignalRelay, serve};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RelayConfig::parse();
    let relay = SignalRelay::new(&config);

    let listener = TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.addr()))?;
    info!(
        "Signaling relay listening on ws://{} (max {} connections)",
        listener.local_addr()?,
        config.max_connections
    );

    serve(listener, relay).await.context("Relay server failed")?;
    Ok(())
}
