// ABOUTME: Storage layer for OAuth state records and credentials
// ABOUTME: Namespaces every key by (provider, org, user) and enforces TTL policy on writes

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::error::AuthResult;
use crate::oauth::provider::ProviderKind;
use crate::oauth::state::StateRecord;
use crate::oauth::types::Credentials;
use hubgate_store::KeyValueStore;

/// Lifetime of a pending authorization's state record.
pub const STATE_TTL: Duration = Duration::from_secs(600);

/// Credential and state persistence on top of the key-value collaborator.
/// Every key carries the (provider, org, user) triple; nothing here can
/// read across tenants.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn credentials_key(kind: ProviderKind, org_id: &str, user_id: &str) -> String {
        format!("{}:credentials:{}:{}", kind, org_id, user_id)
    }

    fn state_key(kind: ProviderKind, org_id: &str, user_id: &str) -> String {
        format!("{}:state:{}:{}", kind, org_id, user_id)
    }

    /// Persist a pending authorization's state record with a short TTL.
    pub async fn save_state(&self, kind: ProviderKind, record: &StateRecord) -> AuthResult<()> {
        let key = Self::state_key(kind, &record.org_id, &record.user_id);
        debug!("Storing state record for {}", key);
        let value = serde_json::to_string(record)?;
        self.store.put(&key, &value, STATE_TTL).await?;
        Ok(())
    }

    /// Look up the pending state for a tenant pair. Expired records read as
    /// absent.
    pub async fn load_state(
        &self,
        kind: ProviderKind,
        org_id: &str,
        user_id: &str,
    ) -> AuthResult<Option<StateRecord>> {
        let key = Self::state_key(kind, org_id, user_id);
        match self.store.get(&key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Delete a consumed state record. Idempotent.
    pub async fn delete_state(
        &self,
        kind: ProviderKind,
        org_id: &str,
        user_id: &str,
    ) -> AuthResult<()> {
        let key = Self::state_key(kind, org_id, user_id);
        debug!("Deleting state record {}", key);
        self.store.delete(&key).await?;
        Ok(())
    }

    /// Persist credentials with a TTL mirroring the token's own lifetime.
    /// Overwrites any previous record for the triple.
    pub async fn save_credentials(
        &self,
        kind: ProviderKind,
        org_id: &str,
        user_id: &str,
        credentials: &Credentials,
    ) -> AuthResult<()> {
        let key = Self::credentials_key(kind, org_id, user_id);
        debug!("Storing credentials for {}", key);
        let value = serde_json::to_string(credentials)?;
        self.store.put(&key, &value, credentials.ttl()).await?;
        Ok(())
    }

    pub async fn load_credentials(
        &self,
        kind: ProviderKind,
        org_id: &str,
        user_id: &str,
    ) -> AuthResult<Option<Credentials>> {
        let key = Self::credentials_key(kind, org_id, user_id);
        match self.store.get(&key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn delete_credentials(
        &self,
        kind: ProviderKind,
        org_id: &str,
        user_id: &str,
    ) -> AuthResult<()> {
        let key = Self::credentials_key(kind, org_id, user_id);
        debug!("Deleting credentials {}", key);
        self.store.delete(&key).await?;
        Ok(())
    }
}
