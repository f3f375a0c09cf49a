//! Pilot-facing pages
//!
//! Demo-friendly pages (dashboard, onboarding, missions, journal, store) use
//! the session token when one exists and otherwise fall back to the shared
//! demo pilot account, so the pilot experience is browsable without an
//! account. Profile and leaderboard are session-gated, and every mutating
//! form post goes through the pilot-UI gate.

use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::forward_multipart;
use crate::error::WebError;
use crate::gate;
use crate::models::{
    JournalEntry, LeaderboardRow, MissionDetail, MissionSummary, OnboardingOverview,
    ProgressSnapshot, Rank, StoreItem, Submission, UserArtifact, UserProfile,
};
use crate::session::{self, Role, Session};
use crate::state::AppState;
use crate::views::{
    self, DashboardTemplate, JournalTemplate, LeaderboardTemplate, MissionDetailTemplate,
    MissionsTemplate, Nav, OnboardingTemplate, ProfileTemplate, StoreTemplate,
};

/// Resolve the bearer token for a demo-friendly page
async fn page_token(
    state: &AppState,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Option<Session>, String), WebError> {
    let (jar, session) = session::current(&state.api, jar).await;
    let token = match &session {
        Some(session) => session.token.clone(),
        None => {
            state
                .demo_tokens
                .token(&state.api, &state.config, Role::Pilot)
                .await?
        }
    };
    Ok((jar, session, token))
}

/// Fetch for a demo-friendly page.
///
/// A cached demo token can outlive its backend session (backend restart,
/// server-side expiry before the TTL). For anonymous visitors an auth
/// failure drops the cache and retries once with a fresh demo login;
/// a real session's auth failure is reported as-is.
async fn demo_page_get<T: serde::de::DeserializeOwned>(
    state: &AppState,
    session: Option<&Session>,
    token: &str,
    path: &str,
) -> Result<T, WebError> {
    match state.api.get(path, Some(token)).await {
        Err(err) if session.is_none() && err.is_auth_failure() => {
            warn!("demo token rejected, logging in again: {err}");
            state.demo_tokens.invalidate().await;
            let fresh = state
                .demo_tokens
                .token(&state.api, &state.config, Role::Pilot)
                .await?;
            Ok(state.api.get(path, Some(&fresh)).await?)
        }
        result => Ok(result?),
    }
}

struct RankProgress {
    current: Option<Rank>,
    next: Option<Rank>,
    xp_progress: i64,
    xp_target: i64,
}

/// Position the pilot on the rank ladder.
///
/// A pilot without an assigned rank is working toward the lowest rank, not
/// holding it.
fn rank_progress(mut ranks: Vec<Rank>, current_rank_id: Option<i64>, xp: i64) -> RankProgress {
    ranks.sort_by_key(|rank| rank.required_xp);

    let current_index =
        current_rank_id.and_then(|id| ranks.iter().position(|rank| rank.id == id));
    let current = current_index.and_then(|index| ranks.get(index).cloned());
    let next = match current_index {
        Some(index) => ranks.get(index + 1).cloned(),
        None => ranks.first().cloned(),
    };

    let baseline = current.as_ref().map(|rank| rank.required_xp).unwrap_or(0);
    let xp_progress = (xp - baseline).max(0);
    let xp_target = next
        .as_ref()
        .map(|rank| rank.required_xp - baseline)
        .unwrap_or(0);

    RankProgress {
        current,
        next,
        xp_progress,
        xp_target,
    }
}

/// Dashboard: profile snapshot plus rank progress computed from the rank list
pub async fn dashboard(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let (jar, session, token) = page_token(&state, jar).await?;

    let profile: UserProfile = demo_page_get(&state, session.as_ref(), &token, "/api/me").await?;
    let ranks: Vec<Rank> = demo_page_get(&state, session.as_ref(), &token, "/api/ranks").await?;

    let progress = rank_progress(ranks, profile.current_rank_id, profile.xp);

    let template = DashboardTemplate {
        nav: Nav::for_session(session.as_ref()),
        profile,
        current_rank: progress.current,
        next_rank: progress.next,
        xp_progress: progress.xp_progress,
        xp_target: progress.xp_target,
    };
    Ok((jar, views::render(&template)?).into_response())
}

/// Onboarding slides with the user's progress
pub async fn onboarding(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let (jar, session, token) = page_token(&state, jar).await?;

    let overview: OnboardingOverview =
        demo_page_get(&state, session.as_ref(), &token, "/api/onboarding/").await?;

    let template = OnboardingTemplate {
        nav: Nav::for_session(session.as_ref()),
        overview,
    };
    Ok((jar, views::render(&template)?).into_response())
}

#[derive(Debug, Deserialize)]
pub struct CompleteOnboardingForm {
    pub order: i64,
}

/// Mark an onboarding step as completed
pub async fn complete_onboarding(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    axum::Form(form): axum::Form<CompleteOnboardingForm>,
) -> Result<Response, WebError> {
    let (jar, _session, token) = page_token(&state, jar).await?;

    state
        .api
        .post_unit(
            "/api/onboarding/complete",
            Some(&token),
            &json!({ "order": form.order }),
        )
        .await?;

    Ok((jar, Redirect::to("/onboarding")).into_response())
}

/// Mission catalogue
pub async fn missions(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let (jar, session, token) = page_token(&state, jar).await?;

    let missions: Vec<MissionSummary> =
        demo_page_get(&state, session.as_ref(), &token, "/api/missions/").await?;

    let template = MissionsTemplate {
        nav: Nav::for_session(session.as_ref()),
        missions,
    };
    Ok((jar, views::render(&template)?).into_response())
}

/// Mission card with the registration and submission forms
pub async fn mission_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let (jar, session, token) = page_token(&state, jar).await?;

    let mission: MissionDetail =
        demo_page_get(&state, session.as_ref(), &token, &format!("/api/missions/{id}")).await?;

    let template = MissionDetailTemplate {
        nav: Nav::for_session(session.as_ref()),
        mission,
        submission: None,
        status: None,
    };
    Ok((jar, views::render(&template)?).into_response())
}

/// Re-render the mission page after a form action, carrying a status line
async fn mission_page_with_status(
    state: &AppState,
    jar: SignedCookieJar,
    session: &Session,
    id: i64,
    submission: Option<Submission>,
    status: String,
) -> Result<Response, WebError> {
    let mission: MissionDetail = state
        .api
        .get(&format!("/api/missions/{id}"), Some(&session.token))
        .await?;

    let template = MissionDetailTemplate {
        nav: Nav::for_session(Some(session)),
        mission,
        submission,
        status: Some(status),
    };
    Ok((jar, views::render(&template)?).into_response())
}

/// Register for the offline stage of a mission
pub async fn register_for_mission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: SignedCookieJar,
    multipart: Multipart,
) -> Result<Response, WebError> {
    let (jar, session) = gate::require_pilot_ui(&state.api, jar).await?;

    let form = forward_multipart(multipart).await?;
    let result = state
        .api
        .post_multipart::<serde_json::Value>(
            &format!("/api/missions/{id}/register"),
            Some(&session.token),
            form,
        )
        .await;

    let status = match result {
        Ok(_) => "Регистрация отправлена! HR свяжется с вами.".to_string(),
        Err(err) => {
            warn!("mission registration failed: {err}");
            err.to_string()
        }
    };

    mission_page_with_status(&state, jar, &session, id, None, status).await
}

/// Submit a mission report with the attached documents
pub async fn submit_mission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: SignedCookieJar,
    multipart: Multipart,
) -> Result<Response, WebError> {
    let (jar, session) = gate::require_pilot_ui(&state.api, jar).await?;

    let form = forward_multipart(multipart).await?;
    let result = state
        .api
        .post_multipart::<Submission>(
            &format!("/api/missions/{id}/submit"),
            Some(&session.token),
            form,
        )
        .await;

    let (submission, status) = match result {
        Ok(submission) => {
            let status = if submission.status == "approved" {
                "Миссия уже зачтена. Вы можете просматривать прикреплённые документы."
            } else {
                "Отчёт и документы отправлены! HR проверит миссию в панели модерации."
            };
            (Some(submission), status.to_string())
        }
        Err(err) => {
            warn!("mission submission failed: {err}");
            (None, err.to_string())
        }
    };

    mission_page_with_status(&state, jar, &session, id, submission, status).await
}

/// Journal timeline
pub async fn journal(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let (jar, session, token) = page_token(&state, jar).await?;

    let entries: Vec<JournalEntry> =
        demo_page_get(&state, session.as_ref(), &token, "/api/journal/").await?;

    let template = JournalTemplate {
        nav: Nav::for_session(session.as_ref()),
        entries,
    };
    Ok((jar, views::render(&template)?).into_response())
}

/// Store front
pub async fn store(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let (jar, session, token) = page_token(&state, jar).await?;

    let items: Vec<StoreItem> =
        demo_page_get(&state, session.as_ref(), &token, "/api/store/items").await?;

    let template = StoreTemplate {
        nav: Nav::for_session(session.as_ref()),
        items,
        error: None,
        info: None,
    };
    Ok((jar, views::render(&template)?).into_response())
}

#[derive(Debug, Deserialize)]
pub struct OrderForm {
    pub item_id: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Place a store order; the backend decides about mana and stock
pub async fn place_order(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    axum::Form(form): axum::Form<OrderForm>,
) -> Result<Response, WebError> {
    let (jar, session) = gate::require_pilot_ui(&state.api, jar).await?;

    let comment = form
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let result = state
        .api
        .post_unit(
            "/api/store/orders",
            Some(&session.token),
            &json!({ "item_id": form.item_id, "comment": comment }),
        )
        .await;

    let (error, info) = match result {
        Ok(()) => (
            None,
            Some("Заказ оформлен! HR подтвердит выдачу.".to_string()),
        ),
        Err(err) => {
            warn!("store order failed: {err}");
            (Some(err.to_string()), None)
        }
    };

    let items: Vec<StoreItem> = state
        .api
        .get("/api/store/items", Some(&session.token))
        .await?;

    let template = StoreTemplate {
        nav: Nav::for_session(Some(&session)),
        items,
        error,
        info,
    };
    Ok((jar, views::render(&template)?).into_response())
}

/// Leaderboard (session-gated)
pub async fn leaderboard(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let (jar, session) = gate::require_session(&state.api, jar).await?;

    let rows: Vec<LeaderboardRow> = state
        .api
        .get("/api/leaderboard", Some(&session.token))
        .await?;

    let template = LeaderboardTemplate {
        nav: Nav::for_session(Some(&session)),
        rows,
    };
    Ok((jar, views::render(&template)?).into_response())
}

/// Profile with progress and artifact management (session-gated)
pub async fn profile(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let (jar, session) = gate::require_session(&state.api, jar).await?;
    let token = session.token.clone();

    let profile: UserProfile = state.api.get("/api/me", Some(&token)).await?;
    let applied_artifacts: Vec<UserArtifact> = state
        .api
        .get("/api/me/applied-artifacts", Some(&token))
        .await?;
    let progress: ProgressSnapshot = state.api.get("/api/progress", Some(&token)).await?;

    let template = ProfileTemplate {
        nav: Nav::for_session(Some(&session)),
        profile,
        applied_artifacts,
        progress,
        public_base_url: state.public_base_url.clone(),
    };
    Ok((jar, views::render(&template)?).into_response())
}

/// Upload a new profile photo (multipart forward)
pub async fn upload_photo(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    multipart: Multipart,
) -> Result<Response, WebError> {
    let (jar, session) = gate::require_session(&state.api, jar).await?;

    let form = forward_multipart(multipart).await?;
    state
        .api
        .post_multipart::<serde_json::Value>("/api/me/photo", Some(&session.token), form)
        .await?;

    Ok((jar, Redirect::to("/profile")).into_response())
}

#[derive(Debug, Deserialize)]
pub struct ApplyArtifactForm {
    pub artifact_id: i64,
}

/// Apply an artifact from the collection
pub async fn apply_artifact(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    axum::Form(form): axum::Form<ApplyArtifactForm>,
) -> Result<Response, WebError> {
    let (jar, session) = gate::require_session(&state.api, jar).await?;

    state
        .api
        .post_unit(
            "/api/me/applied-artifacts",
            Some(&session.token),
            &json!({ "artifact_id": form.artifact_id }),
        )
        .await?;

    Ok((jar, Redirect::to("/profile")).into_response())
}

/// Remove an applied artifact
pub async fn remove_artifact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: SignedCookieJar,
) -> Result<Response, WebError> {
    let (jar, session) = gate::require_session(&state.api, jar).await?;

    state
        .api
        .delete(
            &format!("/api/me/applied-artifacts/{id}"),
            Some(&session.token),
        )
        .await?;

    Ok((jar, Redirect::to("/profile")).into_response())
}
