// ABOUTME: OAuth manager orchestrating the authorize/callback/refresh/fetch lifecycle
// ABOUTME: Provider-agnostic; one manager instance per provider, sharing the key-value collaborator

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{AuthError, AuthResult};
use crate::oauth::provider::{CredentialPolicy, Provider, ProviderKind};
use crate::oauth::state::StateRecord;
use crate::oauth::storage::CredentialStore;
use crate::oauth::types::{CallbackParams, Credentials};
use hubgate_core::IntegrationItem;
use hubgate_store::KeyValueStore;

/// Drives the credential lifecycle for one provider. All operations are
/// request-scoped; the only shared resource is the key-value store behind
/// the credential store.
pub struct OAuthManager {
    provider: Arc<dyn Provider>,
    store: CredentialStore,
}

impl OAuthManager {
    pub fn new(provider: Arc<dyn Provider>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            provider,
            store: CredentialStore::new(store),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    /// Start an authorization attempt for a tenant pair: generate and store
    /// the CSRF state, return the redirect URL. No other side effects.
    pub async fn begin_authorization(&self, user_id: &str, org_id: &str) -> AuthResult<String> {
        let record = StateRecord::new(user_id, org_id);
        self.store.save_state(self.kind(), &record).await?;

        let encoded = record.encode()?;
        let url = self.provider.authorize_url(&encoded)?;
        info!(
            "Issued {} authorization URL for org {} user {}",
            self.kind(),
            org_id,
            user_id
        );
        Ok(url)
    }

    /// Handle the provider redirect: validate state, exchange the code, and
    /// persist credentials. The consumed state record is deleted exactly
    /// once; the delete runs concurrently with the token exchange since
    /// neither needs the other's result.
    pub async fn handle_callback(&self, params: &CallbackParams) -> AuthResult<Credentials> {
        if let Some(error) = &params.error {
            let message = params
                .error_description
                .clone()
                .unwrap_or_else(|| error.clone());
            warn!("{} callback carried provider error: {}", self.kind(), message);
            return Err(AuthError::provider(400, message));
        }

        let code = params
            .code
            .as_deref()
            .ok_or_else(|| AuthError::InvalidCallback("missing code parameter".to_string()))?;
        let incoming = params
            .state
            .as_deref()
            .ok_or_else(|| AuthError::InvalidCallback("missing state parameter".to_string()))?;

        let claimed = StateRecord::decode(incoming)?;
        let stored = self
            .store
            .load_state(self.kind(), &claimed.org_id, &claimed.user_id)
            .await?
            .ok_or(AuthError::StateMismatch)?;

        if stored.state != claimed.state {
            warn!(
                "{} state mismatch for org {} user {}",
                self.kind(),
                claimed.org_id,
                claimed.user_id
            );
            return Err(AuthError::StateMismatch);
        }

        debug!("State validated, exchanging authorization code");
        let (exchanged, deleted) = tokio::join!(
            self.provider.exchange_code(code),
            self.store
                .delete_state(self.kind(), &claimed.org_id, &claimed.user_id),
        );
        if let Err(e) = deleted {
            // The record still expires via its TTL; the exchange result wins.
            warn!("Failed to delete consumed state record: {}", e);
        }

        let credentials = Credentials::from_response(exchanged?);
        self.store
            .save_credentials(self.kind(), &claimed.org_id, &claimed.user_id, &credentials)
            .await?;

        info!(
            "Completed {} authorization for org {} user {}",
            self.kind(),
            claimed.org_id,
            claimed.user_id
        );
        Ok(credentials)
    }

    /// Retrieve stored credentials for a tenant pair. When a refresh token
    /// is present the credentials are proactively refreshed first, so the
    /// caller never receives a token staler than one refresh cycle.
    pub async fn get_credentials(&self, user_id: &str, org_id: &str) -> AuthResult<Credentials> {
        let credentials = self
            .store
            .load_credentials(self.kind(), org_id, user_id)
            .await?
            .ok_or_else(|| {
                AuthError::CredentialsNotFound(format!("No {} credentials found", self.kind()))
            })?;

        let single_use =
            self.provider.config().credential_policy == CredentialPolicy::SingleUse;
        if single_use {
            self.store
                .delete_credentials(self.kind(), org_id, user_id)
                .await?;
        }

        let Some(refresh_token) = credentials.refresh_token.clone() else {
            return Ok(credentials);
        };

        debug!("Refreshing {} credentials before returning", self.kind());
        let response = match self.provider.refresh(&refresh_token).await {
            Ok(response) => response,
            Err(AuthError::Provider { status: 401, .. }) => {
                warn!(
                    "{} refresh rejected as unauthorized for org {} user {}",
                    self.kind(),
                    org_id,
                    user_id
                );
                return Err(AuthError::AuthorizationExpired);
            }
            Err(e) => return Err(e),
        };

        let mut fresh = Credentials::from_response(response);
        // Providers may omit the refresh token on refresh; keep the old one.
        if fresh.refresh_token.is_none() {
            fresh.refresh_token = Some(refresh_token);
        }
        // Single-use credentials were already consumed above; storing the
        // refreshed record would resurrect them.
        if !single_use {
            self.store
                .save_credentials(self.kind(), org_id, user_id, &fresh)
                .await?;
        }
        Ok(fresh)
    }

    /// Fetch and normalize all remote items for a tenant pair.
    pub async fn load_items(&self, user_id: &str, org_id: &str) -> AuthResult<Vec<IntegrationItem>> {
        let credentials = self.get_credentials(user_id, org_id).await?;
        let items = self.provider.list_items(&credentials).await?;
        info!(
            "Fetched {} {} items for org {} user {}",
            items.len(),
            self.kind(),
            org_id,
            user_id
        );
        Ok(items)
    }
}
