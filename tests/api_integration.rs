//! End-to-end API integration tests
//!
//! These tests drive the complete HTTP router over an in-memory store:
//! - Team creation and duplicate-name detection
//! - Reads, partial updates and renames
//! - Deletion and name index cleanup
//! - Error statuses and bodies

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use ipl_teams_api::api;
use ipl_teams_api::domain::team::TeamRegistry;
use ipl_teams_api::infrastructure::stores::InMemoryStore;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot

/// Setup test application over a fresh store
fn setup_app() -> Router {
    let registry = Arc::new(TeamRegistry::new(Arc::new(InMemoryStore::new())));
    api::router(registry)
}

/// Send a request and return status plus parsed JSON body
async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

fn titans() -> Value {
    json!({
        "team_name": "Titans",
        "city": "Chennai",
        "captain": "A"
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_root_banner() {
    let app = setup_app();
    let (status, json) = send(&app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "CRUDL operations for IPL teams meta data");
}

#[tokio::test]
async fn test_create_team_returns_created_record() {
    let app = setup_app();
    let (status, json) = send(&app, "POST", "/teams", Some(titans())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(!json["team_id"].as_str().unwrap().is_empty());
    assert_eq!(json["team_name"], "Titans");
    assert_eq!(json["city"], "Chennai");
    assert_eq!(json["captain"], "A");
    assert!(json["owner"].is_null());
    assert!(json["established_year"].is_null());
    assert_eq!(json["years_won"], json!([]));
}

#[tokio::test]
async fn test_create_duplicate_returns_existing_id() {
    let app = setup_app();
    let (_, first) = send(&app, "POST", "/teams", Some(titans())).await;
    let (status, second) = send(&app, "POST", "/teams", Some(titans())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["team_id"], first["team_id"]);
    assert_eq!(second["message"], "Team already exists");

    let (_, list) = send(&app, "GET", "/teams", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_with_blank_city_is_rejected() {
    let app = setup_app();
    let (status, json) = send(
        &app,
        "POST",
        "/teams",
        Some(json!({ "team_name": "Titans", "city": "", "captain": "A" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("City"));
}

#[tokio::test]
async fn test_create_without_captain_is_rejected() {
    let app = setup_app();
    let (status, _) = send(
        &app,
        "POST",
        "/teams",
        Some(json!({ "team_name": "Titans", "city": "Chennai" })),
    )
    .await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_get_team_round_trip() {
    let app = setup_app();
    let (_, created) = send(
        &app,
        "POST",
        "/teams",
        Some(json!({
            "team_name": "Super Kings",
            "city": "Chennai",
            "owner": "India Cements",
            "captain": "Dhoni",
            "established_year": 2008,
            "years_won": [2010, 2011, 2018]
        })),
    )
    .await;
    let id = created["team_id"].as_str().unwrap();

    let (status, fetched) = send(&app, "GET", &format!("/teams/{}", id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    assert_eq!(fetched["years_won"], json!([2010, 2011, 2018]));
}

#[tokio::test]
async fn test_get_unknown_team_is_404() {
    let app = setup_app();
    let (status, json) = send(&app, "GET", "/teams/does-not-exist", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Team not found");
}

#[tokio::test]
async fn test_patch_preserves_unspecified_fields() {
    let app = setup_app();
    let (_, created) = send(
        &app,
        "POST",
        "/teams",
        Some(json!({ "team_name": "Indians", "city": "Mumbai", "captain": "Rohit" })),
    )
    .await;
    let uri = format!("/teams/{}", created["team_id"].as_str().unwrap());

    let (status, updated) = send(&app, "PATCH", &uri, Some(json!({ "owner": "X" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["city"], "Mumbai");
    assert_eq!(updated["owner"], "X");
    assert_eq!(updated["captain"], "Rohit");
    assert_eq!(updated["team_id"], created["team_id"]);
}

#[tokio::test]
async fn test_patch_unknown_team_is_404() {
    let app = setup_app();
    let (status, _) = send(&app, "PATCH", "/teams/missing", Some(json!({ "coach": "B" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rename_updates_name_index() {
    let app = setup_app();
    let (_, created) = send(&app, "POST", "/teams", Some(titans())).await;
    let id = created["team_id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/teams/{}", id),
        Some(json!({ "team_name": "Gujarat Titans" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, names) = send(&app, "GET", "/team_names", None).await;
    assert_eq!(
        names,
        json!([{ "team_name": "Gujarat Titans", "team_id": id }])
    );
}

#[tokio::test]
async fn test_rename_to_taken_name_is_409() {
    let app = setup_app();
    let (_, titans_team) = send(&app, "POST", "/teams", Some(titans())).await;
    send(
        &app,
        "POST",
        "/teams",
        Some(json!({ "team_name": "Kings", "city": "Mohali", "captain": "B" })),
    )
    .await;

    let (status, json) = send(
        &app,
        "PATCH",
        &format!("/teams/{}", titans_team["team_id"].as_str().unwrap()),
        Some(json!({ "team_name": "Kings" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("Kings"));
}

#[tokio::test]
async fn test_delete_team_removes_name() {
    let app = setup_app();
    let (_, created) = send(&app, "POST", "/teams", Some(titans())).await;
    let uri = format!("/teams/{}", created["team_id"].as_str().unwrap());

    let (status, json) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Team deleted successfully");

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, names) = send(&app, "GET", "/team_names", None).await;
    assert_eq!(names, json!([]));
}

#[tokio::test]
async fn test_list_teams_and_names() {
    let app = setup_app();
    send(&app, "POST", "/teams", Some(titans())).await;
    send(
        &app,
        "POST",
        "/teams",
        Some(json!({ "team_name": "Kings", "city": "Mohali", "captain": "B" })),
    )
    .await;

    let (status, teams) = send(&app, "GET", "/teams", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = teams
        .as_array()
        .unwrap()
        .iter()
        .map(|team| team["team_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Kings", "Titans"]);

    let (status, index) = send(&app, "GET", "/team_names", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(index.as_array().unwrap().len(), 2);
    assert_eq!(index[0]["team_name"], "Kings");
}

#[tokio::test]
async fn test_full_team_lifecycle() {
    let app = setup_app();

    // Step 1: Create
    let (status, created) = send(&app, "POST", "/teams", Some(titans())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["team_id"].as_str().unwrap().to_string();
    let uri = format!("/teams/{}", id);

    // Step 2: Duplicate create
    let (status, dup) = send(&app, "POST", "/teams", Some(titans())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dup, json!({ "team_id": id, "message": "Team already exists" }));

    // Step 3: Update coach
    let (status, updated) = send(&app, "PATCH", &uri, Some(json!({ "coach": "B" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["coach"], "B");
    assert_eq!(updated["team_name"], "Titans");
    assert_eq!(updated["city"], "Chennai");
    assert_eq!(updated["captain"], "A");

    // Step 4: Delete
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, names) = send(&app, "GET", "/team_names", None).await;
    assert!(names
        .as_array()
        .unwrap()
        .iter()
        .all(|entry| entry["team_name"] != "Titans"));
}
