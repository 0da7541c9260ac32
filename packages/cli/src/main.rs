// ABOUTME: Hubgate server entry point
// ABOUTME: Loads configuration, wires providers to the API router, and serves HTTP

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hubgate_api::{create_integrations_router, AppState};
use hubgate_auth::Provider;
use hubgate_providers::build_provider;
use hubgate_store::MemoryStore;

mod config;

use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let providers = config
        .providers
        .iter()
        .cloned()
        .map(build_provider)
        .collect::<Vec<_>>();
    for provider in &providers {
        info!("Configured provider: {}", provider.kind());
    }

    let state = AppState::new(providers, Arc::new(MemoryStore::new()));

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<axum::http::HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .nest("/integrations", create_integrations_router())
        .with_state(state)
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Hubgate listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
