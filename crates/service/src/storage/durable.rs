use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;

/// String key/value storage that survives restarts.
/// Implementations can be file-backed, in-memory, or a platform keychain.
#[async_trait]
pub trait DurableStorage: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String) -> Result<(), ServiceError>;
    async fn remove(&self, keys: &[&str]) -> Result<(), ServiceError>;
}

/// File-backed storage on top of [`JsonMapStore`].
#[derive(Clone)]
pub struct FileStorage {
    store: Arc<JsonMapStore<String, String>>,
}

impl FileStorage {
    /// Open (or create) the storage file.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<String, String>::open(path).await?;
        Ok(Arc::new(Self { store }))
    }
}

#[async_trait]
impl DurableStorage for FileStorage {
    async fn get(&self, key: &str) -> Option<String> {
        self.store.get(&key.to_string()).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ServiceError> {
        self.store.insert(key.to_string(), value).await
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), ServiceError> {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        self.store.remove_all(&keys).await.map(|_| ())
    }
}

/// Process-local storage; a fresh instance behaves like a cleared browser profile.
#[derive(Default)]
pub struct MemoryStorage {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed entries, e.g. to simulate a reload with populated storage.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Arc<Self> {
        let map = entries.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Arc::new(Self { map: Mutex::new(map) })
    }

    pub fn entries(&self) -> HashMap<String, String> {
        self.map.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl DurableStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Option<String> {
        self.map.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ServiceError> {
        self.map.lock().unwrap_or_else(|e| e.into_inner()).insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), ServiceError> {
        let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}
