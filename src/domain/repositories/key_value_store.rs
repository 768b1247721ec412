use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

/// Failure talking to the backing store
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{operation} failed: {message}")]
pub struct StoreError {
    pub operation: &'static str,
    pub message: String,
}

impl StoreError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A single write inside an atomic batch
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Set the given fields on the hash at `key`
    SetFields {
        key: String,
        fields: Vec<(String, String)>,
    },
    /// Remove the whole key
    DeleteKey { key: String },
    /// Remove one field from the hash at `key`
    DeleteField { key: String, field: String },
}

/// Port for the hash-oriented key-value store the registry is built on
///
/// Every method is atomic on its own. `atomic` is the only multi-key
/// primitive: observers see either none or all of its writes.
/// Implementations should handle connection-specific details.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read one field of a hash
    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>>;

    /// Read every field of a hash; empty when the key is absent
    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>>;

    /// Set several fields of a hash at once
    async fn hset_all(&self, key: &str, fields: &[(String, String)]) -> StoreResult<()>;

    /// Set a field only if it does not exist yet; true when written
    async fn hset_nx(&self, key: &str, field: &str, value: &str) -> StoreResult<bool>;

    /// Remove a field from a hash; true when it existed
    async fn hdel(&self, key: &str, field: &str) -> StoreResult<bool>;

    /// Check whether a key exists
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Enumerate every key starting with `prefix`
    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Apply a batch of writes as one unit
    async fn atomic(&self, ops: Vec<WriteOp>) -> StoreResult<()>;
}
