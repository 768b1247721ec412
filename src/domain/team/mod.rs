// Team domain module
// Contains the team aggregate, its value objects and the registry service

#![allow(clippy::module_inception)]

pub mod patch;
pub mod registry;
pub mod team;
pub mod validation;
pub mod value_objects;

// Re-export main types for convenience
pub use patch::TeamPatch;
pub use registry::{CreateOutcome, TeamNameEntry, TeamRegistry};
pub use team::{NewTeam, Team};
pub use value_objects::TeamId;
