// Store implementations (data access layer)
// Adapters that implement the domain KeyValueStore port

pub mod in_memory_store;
pub mod redis_store;

pub use in_memory_store::InMemoryStore;
pub use redis_store::{RedisStore, RedisStoreConfig};
