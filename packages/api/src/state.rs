// ABOUTME: Shared application state for the API layer
// ABOUTME: One OAuth manager per configured provider over a common key-value store

use std::collections::HashMap;
use std::sync::Arc;

use hubgate_auth::{OAuthManager, Provider, ProviderKind};
use hubgate_store::KeyValueStore;

/// Router state: the configured providers' managers, keyed by kind.
#[derive(Clone)]
pub struct AppState {
    managers: Arc<HashMap<ProviderKind, Arc<OAuthManager>>>,
}

impl AppState {
    pub fn new(providers: Vec<Arc<dyn Provider>>, store: Arc<dyn KeyValueStore>) -> Self {
        let managers = providers
            .into_iter()
            .map(|provider| {
                let kind = provider.kind();
                (kind, Arc::new(OAuthManager::new(provider, store.clone())))
            })
            .collect();

        Self {
            managers: Arc::new(managers),
        }
    }

    pub fn manager(&self, kind: ProviderKind) -> Option<Arc<OAuthManager>> {
        self.managers.get(&kind).cloned()
    }

    pub fn configured_kinds(&self) -> Vec<ProviderKind> {
        self.managers.keys().copied().collect()
    }
}
