use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::repositories::{KeyValueStore, StoreResult, WriteOp};

type Hash = HashMap<String, String>;

/// In-process implementation of KeyValueStore
///
/// Mirrors the Redis hash semantics the registry relies on: a hash that
/// loses its last field disappears, and `atomic` applies a whole batch under
/// one write lock. Used by tests and by `STORE_BACKEND=memory`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<HashMap<String, Hash>>,
}

impl InMemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn apply(data: &mut HashMap<String, Hash>, op: WriteOp) {
        match op {
            WriteOp::SetFields { key, fields } => {
                if fields.is_empty() {
                    return;
                }
                data.entry(key).or_default().extend(fields);
            }
            WriteOp::DeleteKey { key } => {
                data.remove(&key);
            }
            WriteOp::DeleteField { key, field } => {
                Self::remove_field(data, &key, &field);
            }
        }
    }

    fn remove_field(data: &mut HashMap<String, Hash>, key: &str, field: &str) -> bool {
        let Some(hash) = data.get_mut(key) else {
            return false;
        };
        let removed = hash.remove(field).is_some();
        if hash.is_empty() {
            data.remove(key);
        }
        removed
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        let data = self.data.read().await;
        Ok(data.get(key).and_then(|hash| hash.get(field)).cloned())
    }

    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        let data = self.data.read().await;
        Ok(data.get(key).cloned().unwrap_or_default())
    }

    async fn hset_all(&self, key: &str, fields: &[(String, String)]) -> StoreResult<()> {
        let mut data = self.data.write().await;
        Self::apply(
            &mut data,
            WriteOp::SetFields {
                key: key.to_string(),
                fields: fields.to_vec(),
            },
        );
        Ok(())
    }

    async fn hset_nx(&self, key: &str, field: &str, value: &str) -> StoreResult<bool> {
        let mut data = self.data.write().await;
        let hash = data.entry(key.to_string()).or_default();
        if hash.contains_key(field) {
            return Ok(false);
        }
        hash.insert(field.to_string(), value.to_string());
        Ok(true)
    }

    async fn hdel(&self, key: &str, field: &str) -> StoreResult<bool> {
        let mut data = self.data.write().await;
        Ok(Self::remove_field(&mut data, key, field))
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let data = self.data.read().await;
        Ok(data.contains_key(key))
    }

    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let data = self.data.read().await;
        Ok(data
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn atomic(&self, ops: Vec<WriteOp>) -> StoreResult<()> {
        let mut data = self.data.write().await;
        for op in ops {
            Self::apply(&mut data, op);
        }
        Ok(())
    }
}
