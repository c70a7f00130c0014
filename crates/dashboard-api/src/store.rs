//! Credential storage

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Key the login token is stored under
pub const TOKEN_KEY: &str = "token";

/// String key/value store holding the login credential
pub trait TokenStore: Send + Sync {
    /// Stored value, `None` when absent
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`
    fn set(&self, key: &str, value: &str);

    /// Remove `key`; no-op if absent
    fn remove(&self, key: &str);
}

/// In-process [`TokenStore`]
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a token under [`TOKEN_KEY`]
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.set(TOKEN_KEY, token);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}
