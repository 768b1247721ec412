// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::domain::team::TeamRegistry;
use handlers::{health, teams};

/// Builds the application router
///
/// Middleware layers are added by the caller so tests can drive the bare
/// routes.
pub fn router(registry: Arc<TeamRegistry>) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/teams", get(teams::list_teams).post(teams::create_team))
        .route(
            "/teams/:id",
            get(teams::get_team)
                .patch(teams::update_team)
                .delete(teams::delete_team),
        )
        .route("/team_names", get(teams::list_team_names))
        .with_state(registry)
}
