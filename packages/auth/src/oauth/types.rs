// ABOUTME: Core type definitions for the OAuth credential lifecycle
// ABOUTME: Token responses from providers, stored credentials, and inbound callback parameters

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fallback credential lifetime when the provider omits `expires_in`.
pub const DEFAULT_CREDENTIAL_TTL_SECS: i64 = 600;

/// Token endpoint response, shared by the authorization-code and refresh
/// grants. Providers differ in which optional fields they populate.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Seconds until expiry; absent for providers issuing non-expiring tokens.
    pub expires_in: Option<i64>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Credentials as stored in the key-value collaborator, scoped by
/// (provider, org, user). The store entry's TTL mirrors `expires_in`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    pub token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Unix timestamp of the exchange or refresh that produced this record.
    pub obtained_at: i64,
}

impl Credentials {
    pub fn from_response(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in.unwrap_or(DEFAULT_CREDENTIAL_TTL_SECS),
            token_type: response.token_type,
            scope: response.scope,
            obtained_at: Utc::now().timestamp(),
        }
    }

    /// Store TTL matching the token's own lifetime. Clamped to at least one
    /// second so a zero `expires_in` never produces an unexpirable entry.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.expires_in.max(1) as u64)
    }
}

/// Query parameters delivered to the callback endpoint by the provider
/// redirect. All optional; validation happens in the manager.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn response(expires_in: Option<i64>) -> TokenResponse {
        TokenResponse {
            access_token: "at".to_string(),
            refresh_token: Some("rt".to_string()),
            expires_in,
            token_type: "bearer".to_string(),
            scope: None,
        }
    }

    #[test]
    fn test_credentials_ttl_mirrors_expiry() {
        let creds = Credentials::from_response(response(Some(1800)));
        assert_eq!(creds.ttl(), Duration::from_secs(1800));
    }

    #[test]
    fn test_credentials_ttl_falls_back_when_absent() {
        let creds = Credentials::from_response(response(None));
        assert_eq!(creds.expires_in, DEFAULT_CREDENTIAL_TTL_SECS);
    }

    #[test]
    fn test_credentials_ttl_never_zero() {
        let creds = Credentials::from_response(response(Some(0)));
        assert_eq!(creds.ttl(), Duration::from_secs(1));
    }

    #[test]
    fn test_token_response_defaults_token_type() {
        let json = r#"{"access_token": "secret-token"}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.token_type, "bearer");
        assert_eq!(response.refresh_token, None);
        assert_eq!(response.expires_in, None);
    }
}
