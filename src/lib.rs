//! IPL Teams API Library
//!
//! CRUD registry for sports-team metadata backed by a key-value store:
//! domain logic, store adapters and the HTTP layer.

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
