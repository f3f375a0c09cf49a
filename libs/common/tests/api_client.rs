//! Integration tests for the backend API client
//!
//! These tests run the client against a stub backend bound on an ephemeral
//! port and verify the wire-level contract: bearer header attachment, the
//! JSON/multipart split, and error-body normalization.

use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use common::{ApiClient, ApiError};

#[derive(Debug, Deserialize)]
struct Profile {
    full_name: String,
    role: String,
}

async fn stub_me(headers: HeaderMap) -> impl IntoResponse {
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some("Bearer pilot-token") => Json(json!({
            "full_name": "Ford Prefect",
            "role": "pilot"
        }))
        .into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Could not validate credentials"})),
        )
            .into_response(),
    }
}

async fn stub_submit(headers: HeaderMap) -> impl IntoResponse {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if !content_type.starts_with("multipart/form-data") {
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Json(json!({"detail": format!("unexpected content type: {content_type}")})),
        )
            .into_response();
    }

    Json(json!({
        "mission_id": 7,
        "status": "pending",
        "comment": "done",
        "proof_url": null,
        "awarded_xp": 0,
        "awarded_mana": 0,
        "updated_at": "2025-01-01T00:00:00Z"
    }))
    .into_response()
}

async fn stub_order() -> impl IntoResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"detail": "Недостаточно маны"})),
    )
}

async fn stub_remove_artifact() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

/// Bind the stub backend and return a client pointed at it
async fn spawn_stub() -> ApiClient {
    let app = Router::new()
        .route("/auth/me", get(stub_me))
        .route("/api/missions/7/submit", post(stub_submit))
        .route("/api/store/orders", post(stub_order))
        .route("/api/me/applied-artifacts/3", delete(stub_remove_artifact));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind stub backend");
    let addr = listener.local_addr().expect("failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub backend died");
    });

    ApiClient::from_base_url(format!("http://{addr}"))
}

#[tokio::test]
async fn test_bearer_header_attached_when_token_supplied() {
    let client = spawn_stub().await;

    let profile: Profile = client
        .get("/auth/me", Some("pilot-token"))
        .await
        .expect("identity check should succeed with the right token");

    assert_eq!(profile.full_name, "Ford Prefect");
    assert_eq!(profile.role, "pilot");
}

#[tokio::test]
async fn test_missing_token_is_a_backend_error_with_detail() {
    let client = spawn_stub().await;

    let result: Result<Profile, _> = client.get("/auth/me", None).await;
    match result {
        Err(ApiError::Backend { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Could not validate credentials");
        }
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_auth_failure_recognized() {
    let client = spawn_stub().await;

    let err = client
        .get::<Profile>("/auth/me", Some("stale-token"))
        .await
        .expect_err("stale token must be rejected");
    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn test_multipart_body_never_carries_json_content_type() {
    let client = spawn_stub().await;

    let form = reqwest::multipart::Form::new()
        .text("comment", "done")
        .part(
            "photo",
            reqwest::multipart::Part::bytes(vec![0xff, 0xd8, 0xff])
                .file_name("pilot.jpg")
                .mime_str("image/jpeg")
                .expect("valid mime"),
        );

    // The stub answers 415 if the content type is anything but multipart.
    let submission: serde_json::Value = client
        .post_multipart("/api/missions/7/submit", Some("pilot-token"), form)
        .await
        .expect("multipart submit should pass the content-type check");

    assert_eq!(submission["status"], "pending");
}

#[tokio::test]
async fn test_backend_rejection_surfaces_localized_detail() {
    let client = spawn_stub().await;

    let err = client
        .post::<_, serde_json::Value>("/api/store/orders", Some("pilot-token"), &json!({"item_id": 1}))
        .await
        .expect_err("order must be rejected");

    match err {
        ApiError::Backend { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Недостаточно маны");
        }
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let client = spawn_stub().await;

    client
        .delete("/api/me/applied-artifacts/3", Some("pilot-token"))
        .await
        .expect("204 with no body is a success");
}

#[tokio::test]
async fn test_network_failure_is_fail_closed() {
    // Nothing listens here; the request must come back as a network error.
    let client = ApiClient::from_base_url("http://127.0.0.1:9");

    let err = client
        .get::<Profile>("/auth/me", Some("pilot-token"))
        .await
        .expect_err("request against a dead backend must fail");

    assert!(matches!(err, ApiError::Network(_)));
    assert!(!err.is_auth_failure());
}
