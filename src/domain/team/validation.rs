//! Team field validation

use chrono::{Datelike, Utc};
use thiserror::Error;

/// Errors raised when team data violates a field rule
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeamValidationError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("{field} {year} is in the future")]
    YearInFuture { field: &'static str, year: i32 },

    #[error("Year won {year} is before the established year {established}")]
    WonBeforeEstablished { year: i32, established: i32 },
}

/// Returns the current calendar year in UTC
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Validate a required text field
pub fn validate_required(field: &'static str, value: &str) -> Result<(), TeamValidationError> {
    if value.trim().is_empty() {
        return Err(TeamValidationError::EmptyField(field));
    }
    Ok(())
}

/// Validate an optional text field (present values must not be blank)
pub fn validate_optional(
    field: &'static str,
    value: Option<&str>,
) -> Result<(), TeamValidationError> {
    match value {
        Some(value) => validate_required(field, value),
        None => Ok(()),
    }
}

/// Validate the established year and the list of winning years
///
/// No year may lie after `current_year`, and no winning year may precede the
/// year the team was established.
pub fn validate_years(
    established_year: Option<i32>,
    years_won: &[i32],
    current_year: i32,
) -> Result<(), TeamValidationError> {
    if let Some(established) = established_year {
        if established > current_year {
            return Err(TeamValidationError::YearInFuture {
                field: "Established year",
                year: established,
            });
        }
    }

    for &year in years_won {
        if year > current_year {
            return Err(TeamValidationError::YearInFuture {
                field: "Year won",
                year,
            });
        }
        if let Some(established) = established_year {
            if year < established {
                return Err(TeamValidationError::WonBeforeEstablished { year, established });
            }
        }
    }

    Ok(())
}
