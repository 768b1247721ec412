use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::domain::team::registry::TEAM_EXISTS_MESSAGE;
use crate::domain::team::{
    CreateOutcome, NewTeam, Team, TeamId, TeamNameEntry, TeamPatch, TeamRegistry,
};

/// Request body for creating a team
#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub team_name: String,
    pub city: String,
    pub owner: Option<String>,
    pub coach: Option<String>,
    pub captain: String,
    pub established_year: Option<i32>,
    #[serde(default, alias = "year_won")]
    pub years_won: Option<Vec<i32>>,
}

impl From<CreateTeamRequest> for NewTeam {
    fn from(req: CreateTeamRequest) -> Self {
        Self {
            team_name: req.team_name,
            city: req.city,
            owner: req.owner,
            coach: req.coach,
            captain: req.captain,
            established_year: req.established_year,
            years_won: req.years_won.unwrap_or_default(),
        }
    }
}

/// Request body for a partial team update
///
/// Omitted and `null` fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTeamRequest {
    pub team_name: Option<String>,
    pub city: Option<String>,
    pub owner: Option<String>,
    pub coach: Option<String>,
    pub captain: Option<String>,
    pub established_year: Option<i32>,
    #[serde(alias = "year_won")]
    pub years_won: Option<Vec<i32>>,
}

impl From<UpdateTeamRequest> for TeamPatch {
    fn from(req: UpdateTeamRequest) -> Self {
        Self {
            team_name: req.team_name,
            city: req.city,
            owner: req.owner,
            coach: req.coach,
            captain: req.captain,
            established_year: req.established_year,
            years_won: req.years_won,
        }
    }
}

/// Full team record as returned by the API
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub team_id: String,
    pub team_name: String,
    pub city: String,
    pub owner: Option<String>,
    pub coach: Option<String>,
    pub captain: String,
    pub established_year: Option<i32>,
    pub years_won: Vec<i32>,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            team_id: team.team_id().to_string(),
            team_name: team.team_name().to_string(),
            city: team.city().to_string(),
            owner: team.owner().map(str::to_string),
            coach: team.coach().map(str::to_string),
            captain: team.captain().to_string(),
            established_year: team.established_year(),
            years_won: team.years_won().to_vec(),
        }
    }
}

/// Response when a create hits an already registered name
#[derive(Debug, Serialize)]
pub struct TeamExistsResponse {
    pub team_id: String,
    pub message: String,
}

/// One row of the name index
#[derive(Debug, Serialize)]
pub struct TeamNameResponse {
    pub team_name: String,
    pub team_id: String,
}

impl From<TeamNameEntry> for TeamNameResponse {
    fn from(entry: TeamNameEntry) -> Self {
        Self {
            team_name: entry.team_name,
            team_id: entry.team_id.to_string(),
        }
    }
}

/// Generic acknowledgement body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn parse_id(raw: String) -> Result<TeamId, ApiError> {
    TeamId::parse(raw).map_err(ApiError::bad_request)
}

/// Create a new team
///
/// POST /teams
///
/// Returns 201 with the new record, or 200 with the existing id when the
/// name is already registered.
pub async fn create_team(
    State(registry): State<Arc<TeamRegistry>>,
    Json(req): Json<CreateTeamRequest>,
) -> Result<Response, ApiError> {
    let outcome = registry.create_team(req.into()).await?;

    let response = match outcome {
        CreateOutcome::Created(team) => {
            (StatusCode::CREATED, Json(TeamResponse::from(&team))).into_response()
        }
        CreateOutcome::Exists { team_id } => (
            StatusCode::OK,
            Json(TeamExistsResponse {
                team_id: team_id.to_string(),
                message: TEAM_EXISTS_MESSAGE.to_string(),
            }),
        )
            .into_response(),
    };

    Ok(response)
}

/// Get a team by ID
///
/// GET /teams/:id
pub async fn get_team(
    State(registry): State<Arc<TeamRegistry>>,
    Path(id): Path<String>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = registry.get_team(&parse_id(id)?).await?;
    Ok(Json(TeamResponse::from(&team)))
}

/// Partially update a team
///
/// PATCH /teams/:id
pub async fn update_team(
    State(registry): State<Arc<TeamRegistry>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTeamRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = registry.update_team(&parse_id(id)?, req.into()).await?;
    Ok(Json(TeamResponse::from(&team)))
}

/// Delete a team
///
/// DELETE /teams/:id
pub async fn delete_team(
    State(registry): State<Arc<TeamRegistry>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    registry.delete_team(&parse_id(id)?).await?;
    Ok(Json(MessageResponse {
        message: "Team deleted successfully".to_string(),
    }))
}

/// List all teams
///
/// GET /teams
pub async fn list_teams(
    State(registry): State<Arc<TeamRegistry>>,
) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    let teams = registry.list_teams().await?;
    Ok(Json(teams.iter().map(TeamResponse::from).collect()))
}

/// List team names with their ids
///
/// GET /team_names
pub async fn list_team_names(
    State(registry): State<Arc<TeamRegistry>>,
) -> Result<Json<Vec<TeamNameResponse>>, ApiError> {
    let names = registry.list_team_names().await?;
    Ok(Json(names.into_iter().map(TeamNameResponse::from).collect()))
}
