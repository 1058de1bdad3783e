//! Key-value storage port.
//!
//! The summary cache only needs four primitives from its backing store. The
//! namespace is shared with settings, so implementations must not assume every
//! key is a cache entry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::Error;

/// Minimal async key-value store holding JSON values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the given keys. Missing keys are simply absent from the result.
    async fn get(&self, keys: &[String]) -> Result<HashMap<String, Value>, Error>;

    /// Upsert every entry of `items`.
    async fn set(&self, items: HashMap<String, Value>) -> Result<(), Error>;

    /// Delete the given keys. Missing keys are ignored.
    async fn remove(&self, keys: &[String]) -> Result<(), Error>;

    /// Fetch the whole namespace.
    async fn get_all(&self) -> Result<HashMap<String, Value>, Error>;

    /// Add one to the counter at `key` and return the new value, as a single
    /// atomic step. A missing or non-integer value counts as zero.
    async fn increment(&self, key: &str) -> Result<u64, Error>;

    /// Fetch a single key.
    async fn get_one(&self, key: &str) -> Result<Option<Value>, Error> {
        let mut found = self.get(&[key.to_string()]).await?;
        Ok(found.remove(key))
    }

    /// Upsert a single key.
    async fn set_one(&self, key: &str, value: Value) -> Result<(), Error> {
        self.set(HashMap::from([(key.to_string(), value)])).await
    }
}

/// In-process store, used in tests and as a non-persistent fallback.
///
/// Uses a HashMap behind a tokio RwLock; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held, across all namespaces.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[String]) -> Result<HashMap<String, Value>, Error> {
        let entries = self.entries.read().await;
        Ok(keys
            .iter()
            .filter_map(|k| entries.get(k).map(|v| (k.clone(), v.clone())))
            .collect())
    }

    async fn set(&self, items: HashMap<String, Value>) -> Result<(), Error> {
        self.entries.write().await.extend(items);
        Ok(())
    }

    async fn remove(&self, keys: &[String]) -> Result<(), Error> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    async fn get_all(&self) -> Result<HashMap<String, Value>, Error> {
        Ok(self.entries.read().await.clone())
    }

    async fn increment(&self, key: &str) -> Result<u64, Error> {
        let mut entries = self.entries.write().await;
        let next = entries.get(key).and_then(Value::as_u64).unwrap_or(0) + 1;
        entries.insert(key.to_string(), Value::from(next));
        Ok(next)
    }
}
