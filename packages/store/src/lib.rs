// ABOUTME: Key-value collaborator boundary for Hubgate
// ABOUTME: Defines the TTL store trait plus an in-memory implementation for tests and local runs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// External key-value collaborator. Keys are namespaced strings, values are
/// opaque serialized blobs, expiry is enforced by the store.
///
/// Concurrent writers for the same key are not coordinated; last write wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, expiring after `ttl`.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()>;

    /// Fetch the value for `key`. Expired entries read as absent.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Remove `key`. Idempotent; deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> StoreResult<()>;
}

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-memory TTL store. Entries expire lazily on read; there is no
/// background sweeper.
#[derive(Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        debug!("Storing key {} (ttl: {:?})", key, ttl);
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Entry exists but has expired; drop it under the write lock.
        debug!("Key {} expired, removing", key);
        self.entries.write().await.remove(key);
        Ok(None)
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        debug!("Deleting key {}", key);
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryStore::new();
        store
            .put("a:b:c", "value", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            store.get("a:b:c").await.unwrap(),
            Some("value".to_string())
        );
        assert_eq!(store.get("other").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let store = MemoryStore::new();
        store
            .put("k", "v", Duration::from_secs(600))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(599)).await;
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryStore::new();
        store.put("k", "v1", Duration::from_secs(60)).await.unwrap();
        store.put("k", "v2", Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some("v2".to_string()));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        store.put("k", "v", Duration::from_secs(60)).await.unwrap();

        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);

        // Deleting again must not fail
        store.delete("k").await.unwrap();
        store.delete("never-existed").await.unwrap();
    }
}
