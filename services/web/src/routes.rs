//! Route table for the web service

use axum::extract::Multipart;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::WebError;
use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod pilot;

/// Create the router for the web service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Auth pages
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
        // Pilot experience
        .route("/", get(pilot::dashboard))
        .route("/onboarding", get(pilot::onboarding))
        .route("/onboarding/complete", post(pilot::complete_onboarding))
        .route("/missions", get(pilot::missions))
        .route("/missions/:id", get(pilot::mission_detail))
        .route("/missions/:id/register", post(pilot::register_for_mission))
        .route("/missions/:id/submit", post(pilot::submit_mission))
        .route("/journal", get(pilot::journal))
        .route("/store", get(pilot::store))
        .route("/store/orders", post(pilot::place_order))
        .route("/leaderboard", get(pilot::leaderboard))
        .route("/profile", get(pilot::profile))
        .route("/profile/photo", post(pilot::upload_photo))
        .route("/profile/artifacts", post(pilot::apply_artifact))
        .route("/profile/artifacts/:id/remove", post(pilot::remove_artifact))
        // HR panel
        .route("/admin", get(admin::dashboard))
        .route("/admin/view-as", get(admin::enter_pilot_view))
        .route("/admin/exit-view", get(admin::exit_pilot_view))
        .route(
            "/admin/submissions/:id/:action",
            post(admin::moderate_submission),
        )
        .route("/admin/missions", post(admin::create_mission))
        .route("/admin/branches", post(admin::create_branch))
        .route("/admin/ranks", post(admin::create_rank))
        .route("/admin/artifacts", post(admin::create_artifact))
        .route("/admin/artifacts/:id/delete", post(admin::delete_artifact))
        .route("/admin/store/items", post(admin::create_store_item))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "mission-control-web"
    }))
}

/// Re-pack an incoming browser multipart form for the backend.
///
/// Text fields are forwarded as text parts, file fields keep their file name
/// and content type. Empty file inputs (no file chosen) are dropped so the
/// backend does not receive zero-byte uploads.
pub(crate) async fn forward_multipart(
    mut multipart: Multipart,
) -> Result<reqwest::multipart::Form, WebError> {
    let mut form = reqwest::multipart::Form::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| WebError::BadRequest(format!("не удалось прочитать форму: {err}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name.is_empty() {
            continue;
        }

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|err| {
                    WebError::BadRequest(format!("не удалось прочитать файл: {err}"))
                })?;

                if file_name.is_empty() && data.is_empty() {
                    continue;
                }

                let mut part = reqwest::multipart::Part::bytes(data.to_vec()).file_name(file_name);
                if let Some(content_type) = content_type {
                    part = part.mime_str(&content_type).map_err(|err| {
                        WebError::BadRequest(format!("неизвестный тип файла: {err}"))
                    })?;
                }
                form = form.part(name, part);
            }
            None => {
                let text = field.text().await.map_err(|err| {
                    WebError::BadRequest(format!("не удалось прочитать поле: {err}"))
                })?;
                form = form.text(name, text);
            }
        }
    }

    Ok(form)
}
