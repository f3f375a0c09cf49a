//! HR panel and the view-as-pilot overlay
//!
//! Every handler here sits behind the HR role gate. Backend calls are made
//! with the HR session's own bearer token, so the backend enforces the role
//! a second time.

use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::forward_multipart;
use crate::error::WebError;
use crate::gate;
use crate::models::{
    AdminStats, Branch, Competency, MissionSummary, Rank, StoreItem, Submission, UserArtifact,
};
use crate::session::{self, Role};
use crate::state::AppState;
use crate::views::{self, AdminTemplate, Nav};

/// The moderation and catalogue overview
pub async fn dashboard(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let (jar, session) = gate::require_role(&state.api, jar, Role::Hr).await?;
    let token = session.token.as_str();

    let stats: AdminStats = state.api.get("/api/admin/stats", Some(token)).await?;
    let submissions: Vec<Submission> = state
        .api
        .get("/api/admin/submissions", Some(token))
        .await?;
    let missions: Vec<MissionSummary> = state.api.get("/api/admin/missions", Some(token)).await?;
    let branches: Vec<Branch> = state.api.get("/api/admin/branches", Some(token)).await?;
    let ranks: Vec<Rank> = state.api.get("/api/admin/ranks", Some(token)).await?;
    let competencies: Vec<Competency> = state
        .api
        .get("/api/admin/competencies", Some(token))
        .await?;
    let artifacts: Vec<UserArtifact> = state.api.get("/api/admin/artifacts", Some(token)).await?;
    let store_items: Vec<StoreItem> = state
        .api
        .get("/api/admin/store/items", Some(token))
        .await?;

    let template = AdminTemplate {
        nav: Nav::for_session(Some(&session)),
        stats,
        submissions,
        missions,
        branches,
        ranks,
        competencies,
        artifacts,
        store_items,
    };
    Ok((jar, views::render(&template)?).into_response())
}

/// Approve or reject a mission submission
pub async fn moderate_submission(
    State(state): State<AppState>,
    Path((id, action)): Path<(i64, String)>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let (jar, session) = gate::require_role(&state.api, jar, Role::Hr).await?;

    if action != "approve" && action != "reject" {
        return Err(WebError::BadRequest(format!(
            "неизвестное действие модерации: {action}"
        )));
    }

    state
        .api
        .post_unit(
            &format!("/api/admin/submissions/{id}/{action}"),
            Some(&session.token),
            &json!({}),
        )
        .await?;
    info!(submission_id = id, action, "submission moderated");

    Ok((jar, Redirect::to("/admin")).into_response())
}

#[derive(Debug, Deserialize)]
pub struct MissionForm {
    pub title: String,
    pub description: String,
    pub xp_reward: i64,
    pub mana_reward: i64,
    pub difficulty: String,
}

pub async fn create_mission(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<MissionForm>,
) -> Result<Response, WebError> {
    let (jar, session) = gate::require_role(&state.api, jar, Role::Hr).await?;

    state
        .api
        .post_unit(
            "/api/admin/missions",
            Some(&session.token),
            &json!({
                "title": form.title,
                "description": form.description,
                "xp_reward": form.xp_reward,
                "mana_reward": form.mana_reward,
                "difficulty": form.difficulty,
            }),
        )
        .await?;

    Ok((jar, Redirect::to("/admin")).into_response())
}

#[derive(Debug, Deserialize)]
pub struct BranchForm {
    pub title: String,
    pub description: String,
    pub category: String,
}

pub async fn create_branch(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<BranchForm>,
) -> Result<Response, WebError> {
    let (jar, session) = gate::require_role(&state.api, jar, Role::Hr).await?;

    state
        .api
        .post_unit(
            "/api/admin/branches",
            Some(&session.token),
            &json!({
                "title": form.title,
                "description": form.description,
                "category": form.category,
            }),
        )
        .await?;

    Ok((jar, Redirect::to("/admin")).into_response())
}

#[derive(Debug, Deserialize)]
pub struct RankForm {
    pub title: String,
    pub description: String,
    pub required_xp: i64,
}

pub async fn create_rank(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<RankForm>,
) -> Result<Response, WebError> {
    let (jar, session) = gate::require_role(&state.api, jar, Role::Hr).await?;

    state
        .api
        .post_unit(
            "/api/admin/ranks",
            Some(&session.token),
            &json!({
                "title": form.title,
                "description": form.description,
                "required_xp": form.required_xp,
            }),
        )
        .await?;

    Ok((jar, Redirect::to("/admin")).into_response())
}

/// Create a store item.
///
/// The backend takes the fields and the image as one multipart form, so the
/// browser form is forwarded as-is.
pub async fn create_store_item(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    multipart: Multipart,
) -> Result<Response, WebError> {
    let (jar, session) = gate::require_role(&state.api, jar, Role::Hr).await?;

    let form = forward_multipart(multipart).await?;
    state
        .api
        .post_multipart::<serde_json::Value>(
            "/api/admin/store/items",
            Some(&session.token),
            form,
        )
        .await?;

    Ok((jar, Redirect::to("/admin")).into_response())
}

#[derive(Debug, Deserialize)]
pub struct ArtifactForm {
    pub name: String,
    pub description: String,
    pub rarity: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

pub async fn create_artifact(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<ArtifactForm>,
) -> Result<Response, WebError> {
    let (jar, session) = gate::require_role(&state.api, jar, Role::Hr).await?;

    let image_url = form
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    state
        .api
        .post_unit(
            "/api/admin/artifacts",
            Some(&session.token),
            &json!({
                "name": form.name,
                "description": form.description,
                "rarity": form.rarity,
                "image_url": image_url,
            }),
        )
        .await?;

    Ok((jar, Redirect::to("/admin")).into_response())
}

pub async fn delete_artifact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let (jar, session) = gate::require_role(&state.api, jar, Role::Hr).await?;

    state
        .api
        .delete(&format!("/api/admin/artifacts/{id}"), Some(&session.token))
        .await?;

    Ok((jar, Redirect::to("/admin")).into_response())
}

/// Switch the HR session into the pilot overlay and land on the dashboard
pub async fn enter_pilot_view(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let (jar, session) = gate::require_role(&state.api, jar, Role::Hr).await?;
    info!(user = %session.full_name, "entering pilot view");

    let jar = session::enable_pilot_view(jar, state.config.secure_cookies);
    Ok((jar, Redirect::to("/")).into_response())
}

/// Drop the overlay and return to the panel
pub async fn exit_pilot_view(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let (jar, _session) = gate::require_role(&state.api, jar, Role::Hr).await?;

    let jar = session::disable_pilot_view(jar);
    Ok((jar, Redirect::to("/admin")).into_response())
}
