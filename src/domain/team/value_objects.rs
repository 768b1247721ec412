use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of a team
///
/// Identifiers are generated by the registry when a team is created and are
/// never reused, even after the team is deleted. Callers only ever hand back
/// identifiers they received, so any non-blank string is accepted when
/// parsing.
///
/// # Example
/// ```
/// use ipl_teams_api::domain::team::value_objects::TeamId;
///
/// let id = TeamId::generate();
/// assert_eq!(TeamId::parse(id.as_str()).unwrap(), id);
/// assert!(TeamId::parse("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    /// Generates a fresh identifier from 122 bits of randomness (UUID v4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parses a caller-supplied identifier
    ///
    /// # Returns
    /// * `Ok(TeamId)` - If the value is not blank
    /// * `Err(String)` - If the value is empty or whitespace only
    pub fn parse(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err("Team ID cannot be empty".to_string());
        }
        Ok(Self(value))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
