// ABOUTME: Hubgate authentication library driving OAuth2 flows for SaaS integrations
// ABOUTME: Provides the provider abstraction, CSRF state handling, and credential lifecycle

pub mod error;
pub mod oauth;

// Re-export main types
pub use error::{AuthError, AuthResult};
pub use oauth::{
    CallbackParams, CredentialPolicy, CredentialStore, Credentials, OAuthManager, Provider,
    ProviderConfig, ProviderKind, StateRecord, TokenResponse,
};
