use anyhow::Result;
use aqi_predict::{config::AppConfig, context::AqiContext, service::AqiServer};
use rmcp::ServiceExt;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Optional .env with data and model paths
    dotenvy::dotenv().ok();

    // stdout carries the MCP transport, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aqi_predict=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting AQI prediction server");

    let config = AppConfig::from_env();
    tracing::info!(?config, "Loading prediction context");
    let context = Arc::new(AqiContext::load(&config)?);

    let server = AqiServer::new(context).serve(rmcp::transport::stdio()).await?;
    server.waiting().await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
