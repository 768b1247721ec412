use axum::Json;

use super::teams::MessageResponse;

/// Service banner
///
/// GET /
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "CRUDL operations for IPL teams meta data".to_string(),
    })
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
