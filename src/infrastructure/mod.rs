// Infrastructure layer module
// Contains key-value store adapters
// Follows Hexagonal Architecture

pub mod stores;
