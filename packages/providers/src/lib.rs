// ABOUTME: Concrete Provider implementations for Hubgate
// ABOUTME: HubSpot (CRM contacts) and Notion (workspace objects) behind the shared Provider trait

use std::sync::Arc;
use std::time::Duration;

use hubgate_auth::{CredentialPolicy, Provider, ProviderConfig, ProviderKind};

pub mod hubspot;
pub mod notion;

pub use hubspot::HubspotProvider;
pub use notion::NotionProvider;

/// Timeout for token exchange and refresh calls.
pub(crate) const TOKEN_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for a single resource-listing page request.
pub(crate) const LIST_TIMEOUT: Duration = Duration::from_secs(30);
/// Fixed page size requested from every provider.
pub(crate) const PAGE_SIZE: u32 = 100;

/// Construct the provider implementation matching the config's kind.
pub fn build_provider(config: ProviderConfig) -> Arc<dyn Provider> {
    match config.kind {
        ProviderKind::Hubspot => Arc::new(HubspotProvider::new(config)),
        ProviderKind::Notion => Arc::new(NotionProvider::new(config)),
    }
}

/// Production endpoints and policy for a provider kind, parameterized by
/// the app registration (client credentials and redirect URI).
pub fn default_config(
    kind: ProviderKind,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
) -> ProviderConfig {
    match kind {
        ProviderKind::Hubspot => ProviderConfig {
            kind,
            auth_url: "https://app.hubspot.com/oauth/authorize".to_string(),
            token_url: "https://api.hubapi.com/oauth/v1/token".to_string(),
            api_base_url: "https://api.hubapi.com".to_string(),
            client_id,
            client_secret,
            redirect_uri,
            scopes: vec!["crm.objects.contacts.read".to_string()],
            credential_policy: CredentialPolicy::Persistent,
        },
        ProviderKind::Notion => ProviderConfig {
            kind,
            auth_url: "https://api.notion.com/v1/oauth/authorize".to_string(),
            token_url: "https://api.notion.com/v1/oauth/token".to_string(),
            api_base_url: "https://api.notion.com".to_string(),
            client_id,
            client_secret,
            redirect_uri,
            // Notion grants access per-workspace at consent time, not via scopes
            scopes: vec![],
            credential_policy: CredentialPolicy::SingleUse,
        },
    }
}
