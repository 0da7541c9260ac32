// ABOUTME: HTTP request handlers for the integration OAuth lifecycle
// ABOUTME: Authorize, callback, credential retrieval, and normalized item loading per provider

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use hubgate_auth::{
    AuthError, CallbackParams, Credentials, OAuthManager, ProviderKind,
};
use hubgate_core::IntegrationItem;

/// Minimal page closing the OAuth popup once the handshake completes.
const CLOSE_WINDOW_PAGE: &str = "<html>\n  <script>\n    window.close();\n  </script>\n</html>\n";

/// Tenant pair carried by every integration request.
#[derive(Debug, Deserialize)]
pub struct TenantRequest {
    pub user_id: String,
    pub org_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeResponse {
    pub url: String,
}

/// Start an authorization attempt; returns the provider redirect URL.
pub async fn authorize(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(request): Json<TenantRequest>,
) -> Result<Json<AuthorizeResponse>, ApiError> {
    info!(
        "Authorization requested for {} (org: {}, user: {})",
        provider, request.org_id, request.user_id
    );

    let manager = resolve_manager(&state, &provider)?;
    let url = manager
        .begin_authorization(&request.user_id, &request.org_id)
        .await?;
    Ok(Json(AuthorizeResponse { url }))
}

/// Provider redirect target: validates state, exchanges the code, persists
/// credentials, and tells the popup to close itself.
pub async fn oauth_callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
) -> Result<Html<&'static str>, ApiError> {
    info!("OAuth callback received for {}", provider);

    let manager = resolve_manager(&state, &provider)?;
    manager.handle_callback(&params).await?;
    Ok(Html(CLOSE_WINDOW_PAGE))
}

/// Return stored credentials for a tenant pair, refreshed when possible.
pub async fn get_credentials(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(request): Json<TenantRequest>,
) -> Result<Json<Credentials>, ApiError> {
    info!(
        "Credentials requested for {} (org: {}, user: {})",
        provider, request.org_id, request.user_id
    );

    let manager = resolve_manager(&state, &provider)?;
    let credentials = manager
        .get_credentials(&request.user_id, &request.org_id)
        .await?;
    Ok(Json(credentials))
}

/// Fetch and normalize all remote items for a tenant pair.
pub async fn load_items(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(request): Json<TenantRequest>,
) -> Result<Json<Vec<IntegrationItem>>, ApiError> {
    info!(
        "Items requested for {} (org: {}, user: {})",
        provider, request.org_id, request.user_id
    );

    let manager = resolve_manager(&state, &provider)?;
    let items = manager
        .load_items(&request.user_id, &request.org_id)
        .await?;
    Ok(Json(items))
}

/// Parse the path segment and look up the configured manager. Unknown or
/// unconfigured providers are client errors.
fn resolve_manager(state: &AppState, provider: &str) -> Result<Arc<OAuthManager>, ApiError> {
    let kind: ProviderKind = provider.parse()?;
    state.manager(kind).ok_or_else(|| {
        ApiError::from(AuthError::Configuration(format!(
            "Provider {} is not configured",
            kind
        )))
    })
}
