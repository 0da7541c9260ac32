// ABOUTME: Provider abstraction for OAuth2-protected SaaS services
// ABOUTME: Provider kinds, immutable per-provider configuration, and the polymorphic Provider trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{AuthError, AuthResult};
use crate::oauth::types::{Credentials, TokenResponse};
use hubgate_core::IntegrationItem;

/// Supported integration providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Hubspot,
    Notion,
}

impl ProviderKind {
    pub fn all() -> Vec<Self> {
        vec![Self::Hubspot, Self::Notion]
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hubspot => write!(f, "hubspot"),
            Self::Notion => write!(f, "notion"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = AuthError;

    fn from_str(s: &str) -> AuthResult<Self> {
        match s.to_lowercase().as_str() {
            "hubspot" => Ok(Self::Hubspot),
            "notion" => Ok(Self::Notion),
            _ => Err(AuthError::Configuration(format!(
                "Unknown provider: {}. Supported: hubspot, notion",
                s
            ))),
        }
    }
}

/// What happens to stored credentials when they are read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialPolicy {
    /// Credentials stay in the store until they expire or are overwritten.
    Persistent,
    /// Credentials are deleted on first read (single-use handoff).
    SingleUse,
}

/// Immutable per-provider configuration, built once at startup and passed
/// into the manager. Never a global.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub auth_url: String,
    pub token_url: String,
    pub api_base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub credential_policy: CredentialPolicy,
}

/// An external OAuth2-protected service. One implementation per provider;
/// the manager drives the lifecycle through this seam only.
#[async_trait]
pub trait Provider: Send + Sync {
    fn config(&self) -> &ProviderConfig;

    fn kind(&self) -> ProviderKind {
        self.config().kind
    }

    /// Extra provider-specific query parameters for the authorize URL.
    fn authorize_extra_params(&self) -> Vec<(&'static str, &'static str)> {
        vec![]
    }

    /// Build the browser authorization URL embedding client id, redirect
    /// URI, scopes, and the encoded CSRF state.
    fn authorize_url(&self, state: &str) -> AuthResult<String> {
        let config = self.config();
        let mut url = Url::parse(&config.auth_url)
            .map_err(|e| AuthError::Configuration(format!("Invalid auth URL: {}", e)))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("client_id", &config.client_id)
                .append_pair("redirect_uri", &config.redirect_uri)
                .append_pair("response_type", "code");
            if !config.scopes.is_empty() {
                pairs.append_pair("scope", &config.scopes.join(" "));
            }
            for (key, value) in self.authorize_extra_params() {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("state", state);
        }

        Ok(url.to_string())
    }

    /// Exchange an authorization code for tokens at the provider's token
    /// endpoint.
    async fn exchange_code(&self, code: &str) -> AuthResult<TokenResponse>;

    /// Exchange a refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenResponse>;

    /// Fetch all remote items, following the provider's pagination cursor to
    /// exhaustion, and map them into the normalized shape.
    async fn list_items(&self, credentials: &Credentials) -> AuthResult<Vec<IntegrationItem>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UrlOnlyProvider {
        config: ProviderConfig,
    }

    #[async_trait]
    impl Provider for UrlOnlyProvider {
        fn config(&self) -> &ProviderConfig {
            &self.config
        }

        async fn exchange_code(&self, _code: &str) -> AuthResult<TokenResponse> {
            unimplemented!()
        }

        async fn refresh(&self, _refresh_token: &str) -> AuthResult<TokenResponse> {
            unimplemented!()
        }

        async fn list_items(
            &self,
            _credentials: &Credentials,
        ) -> AuthResult<Vec<IntegrationItem>> {
            unimplemented!()
        }
    }

    fn test_config(scopes: Vec<String>) -> ProviderConfig {
        ProviderConfig {
            kind: ProviderKind::Hubspot,
            auth_url: "https://example.com/oauth/authorize".to_string(),
            token_url: "https://example.com/oauth/token".to_string(),
            api_base_url: "https://api.example.com".to_string(),
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: "http://localhost:8000/callback".to_string(),
            scopes,
            credential_policy: CredentialPolicy::Persistent,
        }
    }

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!(
            "hubspot".parse::<ProviderKind>().unwrap(),
            ProviderKind::Hubspot
        );
        assert_eq!(
            "NOTION".parse::<ProviderKind>().unwrap(),
            ProviderKind::Notion
        );
        assert!("airtable".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_provider_kind_display_roundtrip() {
        for kind in ProviderKind::all() {
            assert_eq!(kind.to_string().parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_authorize_url_embeds_parameters() {
        let provider = UrlOnlyProvider {
            config: test_config(vec!["contacts".to_string(), "content".to_string()]),
        };

        let url = provider.authorize_url("encoded-state").unwrap();
        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(pairs.contains(&("client_id".to_string(), "client-id".to_string())));
        assert!(pairs.contains(&("scope".to_string(), "contacts content".to_string())));
        assert!(pairs.contains(&("state".to_string(), "encoded-state".to_string())));
        assert!(pairs.contains(&("response_type".to_string(), "code".to_string())));
    }

    #[test]
    fn test_authorize_url_omits_empty_scope() {
        let provider = UrlOnlyProvider {
            config: test_config(vec![]),
        };

        let url = provider.authorize_url("s").unwrap();
        assert!(!url.contains("scope="));
    }
}
