use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::repositories::{KeyValueStore, StoreError, StoreResult, WriteOp};

const SCAN_BATCH: usize = 100;

/// Configuration for the Redis store
#[derive(Debug, Clone)]
pub struct RedisStoreConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Namespace prepended to every key as `{prefix}:{key}`
    pub key_prefix: Option<String>,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: None,
        }
    }
}

impl RedisStoreConfig {
    /// Creates a configuration for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }
}

/// Redis implementation of KeyValueStore
///
/// Hashes map onto Redis hashes one to one. Enumeration uses SCAN, never
/// KEYS, and `atomic` runs its batch inside MULTI/EXEC. The connection
/// manager reconnects on its own and is cheap to clone per call.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    config: RedisStoreConfig,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisStore {
    /// Connects to Redis
    pub async fn connect(config: RedisStoreConfig) -> StoreResult<Self> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| StoreError::new("OPEN", format!("invalid Redis URL: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::new("CONNECT", e.to_string()))?;

        Ok(Self { connection, config })
    }

    fn prefix_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }

    fn strip_prefix(&self, key: String) -> String {
        match &self.config.key_prefix {
            Some(prefix) => key
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_prefix(':'))
                .map(str::to_string)
                .unwrap_or(key),
            None => key,
        }
    }
}

/// Escapes glob metacharacters so `value` matches literally in SCAN MATCH
fn escape_glob(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        let mut conn = self.connection.clone();
        conn.hget(self.prefix_key(key), field)
            .await
            .map_err(|e| StoreError::new("HGET", e.to_string()))
    }

    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        let mut conn = self.connection.clone();
        conn.hgetall(self.prefix_key(key))
            .await
            .map_err(|e| StoreError::new("HGETALL", e.to_string()))
    }

    async fn hset_all(&self, key: &str, fields: &[(String, String)]) -> StoreResult<()> {
        let mut conn = self.connection.clone();
        conn.hset_multiple(self.prefix_key(key), fields)
            .await
            .map_err(|e| StoreError::new("HSET", e.to_string()))
    }

    async fn hset_nx(&self, key: &str, field: &str, value: &str) -> StoreResult<bool> {
        let mut conn = self.connection.clone();
        conn.hset_nx(self.prefix_key(key), field, value)
            .await
            .map_err(|e| StoreError::new("HSETNX", e.to_string()))
    }

    async fn hdel(&self, key: &str, field: &str) -> StoreResult<bool> {
        let mut conn = self.connection.clone();
        let removed: i64 = conn
            .hdel(self.prefix_key(key), field)
            .await
            .map_err(|e| StoreError::new("HDEL", e.to_string()))?;
        Ok(removed > 0)
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.connection.clone();
        conn.exists(self.prefix_key(key))
            .await
            .map_err(|e| StoreError::new("EXISTS", e.to_string()))
    }

    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let pattern = format!("{}*", escape_glob(&self.prefix_key(prefix)));
        let mut conn = self.connection.clone();
        let mut cursor = 0u64;
        let mut keys = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| StoreError::new("SCAN", e.to_string()))?;

            keys.extend(batch.into_iter().map(|key| self.strip_prefix(key)));

            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        // SCAN may return a key more than once across iterations
        keys.sort();
        keys.dedup();
        Ok(keys)
    }

    async fn atomic(&self, ops: Vec<WriteOp>) -> StoreResult<()> {
        if ops.is_empty() {
            return Ok(());
        }

        let mut pipe = redis::pipe();
        pipe.atomic();
        for op in &ops {
            match op {
                WriteOp::SetFields { key, fields } => {
                    pipe.hset_multiple(self.prefix_key(key), fields.as_slice()).ignore();
                }
                WriteOp::DeleteKey { key } => {
                    pipe.del(self.prefix_key(key)).ignore();
                }
                WriteOp::DeleteField { key, field } => {
                    pipe.hdel(self.prefix_key(key), field).ignore();
                }
            }
        }

        let mut conn = self.connection.clone();
        let _: () = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::new("MULTI/EXEC", e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_glob_leaves_plain_text() {
        assert_eq!(escape_glob("ipl:teams:"), "ipl:teams:");
    }

    #[test]
    fn escape_glob_escapes_metacharacters() {
        assert_eq!(escape_glob("a*b?[c]\\"), "a\\*b\\?\\[c\\]\\\\");
    }

    #[test]
    fn config_builder() {
        let config = RedisStoreConfig::new("redis://cache:6379").with_key_prefix("ipl");
        assert_eq!(config.url, "redis://cache:6379");
        assert_eq!(config.key_prefix.as_deref(), Some("ipl"));
    }

    #[test]
    fn default_config_points_at_localhost() {
        let config = RedisStoreConfig::default();
        assert_eq!(config.url, "redis://127.0.0.1:6379");
        assert!(config.key_prefix.is_none());
    }
}
