// ABOUTME: HTTP API layer for Hubgate providing REST endpoints and routing
// ABOUTME: Integration layer wiring the OAuth managers to axum handlers

use axum::{
    routing::{get, post},
    Router,
};

pub mod error;
pub mod integrations_handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

/// Creates the integrations API router (nested under /integrations)
pub fn create_integrations_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{provider}/authorize",
            post(integrations_handlers::authorize),
        )
        .route(
            "/{provider}/callback",
            get(integrations_handlers::oauth_callback),
        )
        .route(
            "/{provider}/credentials",
            post(integrations_handlers::get_credentials),
        )
        .route("/{provider}/items", post(integrations_handlers::load_items))
}
