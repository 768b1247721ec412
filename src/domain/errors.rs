use thiserror::Error;

use crate::domain::repositories::StoreError;
use crate::domain::team::team::TeamDecodeError;
use crate::domain::team::validation::TeamValidationError;
use crate::domain::team::value_objects::TeamId;

/// Errors returned by the team registry
///
/// A duplicate name on create is not an error; it is reported through
/// `CreateOutcome::Exists`.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Team not found: {0}")]
    NotFound(TeamId),

    #[error("Invalid team data: {0}")]
    Validation(#[from] TeamValidationError),

    #[error("Team name '{name}' is already used by team {team_id}")]
    NameTaken { name: String, team_id: TeamId },

    #[error("Team name '{0}' is being changed concurrently, retry the request")]
    NameContention(String),

    #[error("Stored record for team {team_id} is corrupt: {source}")]
    CorruptRecord {
        team_id: TeamId,
        #[source]
        source: TeamDecodeError,
    },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
