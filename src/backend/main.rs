/**
 * EstateHub Server Entry Point
 *
 * Loads `.env`, initializes tracing, reads the configuration and serves the
 * API on `HTTP_ADDR`.
 */

use std::net::SocketAddr;

use estatehub::backend::server::{create_app, AppConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,estatehub=debug")),
        )
        .init();

    let config = AppConfig::from_env();
    let addr = config.http_addr;

    let app = create_app(config).await;

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
