use std::collections::HashMap;

use thiserror::Error;

use super::patch::TeamPatch;
use super::validation::{
    current_year, validate_optional, validate_required, validate_years, TeamValidationError,
};
use super::value_objects::TeamId;

/// Hash field names used when a team is persisted
pub mod fields {
    pub const TEAM_ID: &str = "team_id";
    pub const TEAM_NAME: &str = "team_name";
    pub const CITY: &str = "city";
    pub const OWNER: &str = "owner";
    pub const COACH: &str = "coach";
    pub const CAPTAIN: &str = "captain";
    pub const ESTABLISHED_YEAR: &str = "established_year";
    pub const YEARS_WON: &str = "years_won";
}

/// Attributes supplied by a caller when creating a team
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTeam {
    pub team_name: String,
    pub city: String,
    pub owner: Option<String>,
    pub coach: Option<String>,
    pub captain: String,
    pub established_year: Option<i32>,
    pub years_won: Vec<i32>,
}

/// Errors raised when a stored hash cannot be turned back into a team
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeamDecodeError {
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Team aggregate root
///
/// Metadata for one franchise. The identifier is assigned on creation and is
/// immutable; every other attribute can change through [`Team::apply`].
///
/// # Invariants
/// - Team name, city and captain are never blank
/// - Owner and coach are either absent or non-blank
/// - No year lies in the future, and no winning year precedes the
///   established year
///
/// # Example
/// ```
/// use ipl_teams_api::domain::team::{NewTeam, Team};
///
/// let team = Team::new(NewTeam {
///     team_name: "Titans".to_string(),
///     city: "Chennai".to_string(),
///     captain: "A".to_string(),
///     ..Default::default()
/// })
/// .expect("valid team");
///
/// assert_eq!(team.team_name(), "Titans");
/// assert!(team.years_won().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    team_id: TeamId,
    team_name: String,
    city: String,
    owner: Option<String>,
    coach: Option<String>,
    captain: String,
    established_year: Option<i32>,
    years_won: Vec<i32>,
}

impl Team {
    /// Creates a new Team with a freshly generated identifier
    ///
    /// # Returns
    /// * `Ok(Team)` - The new team
    /// * `Err(TeamValidationError)` - If any invariant is violated
    pub fn new(draft: NewTeam) -> Result<Self, TeamValidationError> {
        let team = Self {
            team_id: TeamId::generate(),
            team_name: draft.team_name,
            city: draft.city,
            owner: draft.owner,
            coach: draft.coach,
            captain: draft.captain,
            established_year: draft.established_year,
            years_won: draft.years_won,
        };

        team.validate()?;
        Ok(team)
    }

    /// Applies a partial update
    ///
    /// Only the attributes present in `patch` overwrite stored ones. The
    /// merged team is validated as a whole; on error `self` is unchanged.
    pub fn apply(&mut self, patch: TeamPatch) -> Result<(), TeamValidationError> {
        let mut merged = self.clone();

        if let Some(team_name) = patch.team_name {
            merged.team_name = team_name;
        }
        if let Some(city) = patch.city {
            merged.city = city;
        }
        if let Some(owner) = patch.owner {
            merged.owner = Some(owner);
        }
        if let Some(coach) = patch.coach {
            merged.coach = Some(coach);
        }
        if let Some(captain) = patch.captain {
            merged.captain = captain;
        }
        if let Some(established_year) = patch.established_year {
            merged.established_year = Some(established_year);
        }
        if let Some(years_won) = patch.years_won {
            merged.years_won = years_won;
        }

        merged.validate()?;
        *self = merged;
        Ok(())
    }

    fn validate(&self) -> Result<(), TeamValidationError> {
        validate_required("Team name", &self.team_name)?;
        validate_required("City", &self.city)?;
        validate_required("Captain", &self.captain)?;
        validate_optional("Owner", self.owner.as_deref())?;
        validate_optional("Coach", self.coach.as_deref())?;
        validate_years(self.established_year, &self.years_won, current_year())
    }

    // ===== Getters =====

    pub fn team_id(&self) -> &TeamId {
        &self.team_id
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn coach(&self) -> Option<&str> {
        self.coach.as_deref()
    }

    pub fn captain(&self) -> &str {
        &self.captain
    }

    pub fn established_year(&self) -> Option<i32> {
        self.established_year
    }

    pub fn years_won(&self) -> &[i32] {
        &self.years_won
    }

    // ===== Persistence =====

    /// Encodes the team as flat hash fields
    ///
    /// Absent optional attributes are omitted; `years_won` is stored as a
    /// JSON array string.
    pub fn to_hash_fields(&self) -> Vec<(String, String)> {
        let mut out = vec![
            (fields::TEAM_ID.to_string(), self.team_id.to_string()),
            (fields::TEAM_NAME.to_string(), self.team_name.clone()),
            (fields::CITY.to_string(), self.city.clone()),
            (fields::CAPTAIN.to_string(), self.captain.clone()),
        ];

        if let Some(owner) = &self.owner {
            out.push((fields::OWNER.to_string(), owner.clone()));
        }
        if let Some(coach) = &self.coach {
            out.push((fields::COACH.to_string(), coach.clone()));
        }
        if let Some(year) = self.established_year {
            out.push((fields::ESTABLISHED_YEAR.to_string(), year.to_string()));
        }

        let years_won = serde_json::Value::from(self.years_won.clone()).to_string();
        out.push((fields::YEARS_WON.to_string(), years_won));

        out
    }

    /// Reconstructs a Team from the hash stored under `team_id`
    ///
    /// Stored data is trusted, so business rules are not re-checked here;
    /// only the encoding is. A `team_id` field that disagrees with the key
    /// is treated as corruption.
    pub fn from_hash_fields(
        team_id: TeamId,
        hash: &HashMap<String, String>,
    ) -> Result<Self, TeamDecodeError> {
        let required = |field: &'static str| {
            hash.get(field)
                .cloned()
                .ok_or(TeamDecodeError::MissingField(field))
        };

        if let Some(stored_id) = hash.get(fields::TEAM_ID) {
            if stored_id != team_id.as_str() {
                return Err(TeamDecodeError::InvalidField {
                    field: fields::TEAM_ID,
                    reason: format!("'{}' does not match key id '{}'", stored_id, team_id),
                });
            }
        }

        let established_year = hash
            .get(fields::ESTABLISHED_YEAR)
            .map(|raw| {
                raw.parse::<i32>().map_err(|e| TeamDecodeError::InvalidField {
                    field: fields::ESTABLISHED_YEAR,
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let years_won = match hash.get(fields::YEARS_WON) {
            Some(raw) => {
                serde_json::from_str::<Vec<i32>>(raw).map_err(|e| {
                    TeamDecodeError::InvalidField {
                        field: fields::YEARS_WON,
                        reason: e.to_string(),
                    }
                })?
            }
            None => Vec::new(),
        };

        Ok(Self {
            team_id,
            team_name: required(fields::TEAM_NAME)?,
            city: required(fields::CITY)?,
            owner: hash.get(fields::OWNER).cloned(),
            coach: hash.get(fields::COACH).cloned(),
            captain: required(fields::CAPTAIN)?,
            established_year,
            years_won,
        })
    }
}
