// ABOUTME: OAuth2 authorization-code flow implementation
// ABOUTME: Module organization for provider abstraction, state, storage, and the manager

pub mod manager;
pub mod provider;
pub mod state;
pub mod storage;
pub mod types;

pub use manager::OAuthManager;
pub use provider::{CredentialPolicy, Provider, ProviderConfig, ProviderKind};
pub use state::StateRecord;
pub use storage::CredentialStore;
pub use types::{CallbackParams, Credentials, TokenResponse};
