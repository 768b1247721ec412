// Repository ports (interfaces implemented by infrastructure adapters)

pub mod key_value_store;

pub use key_value_store::{KeyValueStore, StoreError, StoreResult, WriteOp};
