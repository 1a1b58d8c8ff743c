//! ShareIt Gateway
//!
//! Validates incoming requests and forwards the valid ones to the server.

use std::net::SocketAddr;

use anyhow::Context;

use shareit::{
    config::AppConfig,
    gateway::{self, GatewayState, ShareItClient},
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    telemetry::init_tracing(&config.logging);

    tracing::info!("Starting ShareIt gateway v{}", env!("CARGO_PKG_VERSION"));

    let client = ShareItClient::new(&config.gateway)?;
    tracing::info!("Forwarding to {}", client.base_url());

    let addr = SocketAddr::new(
        config.gateway.host.parse().context("Invalid host address")?,
        config.gateway.port,
    );

    let app = gateway::router(GatewayState { client });

    tracing::info!("Gateway listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
