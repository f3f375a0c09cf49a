//! Login, registration and logout

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::error::WebError;
use crate::models::{MeResponse, RegisterOutcome, TokenResponse};
use crate::session::{self, Role, SessionPayload};
use crate::state::AppState;
use crate::validation;
use crate::views::{self, LoginTemplate, Nav, RegisterTemplate};

/// Messages surfaced on the login/register pages via the query string
#[derive(Debug, Deserialize, Default)]
pub struct AuthQuery {
    pub error: Option<String>,
    pub info: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub preferred_branch: Option<String>,
    #[serde(default)]
    pub motivation: Option<String>,
}

fn login_page_response(
    jar: SignedCookieJar,
    error: Option<String>,
    info: Option<String>,
) -> Result<Response, WebError> {
    let template = LoginTemplate {
        nav: Nav::for_session(None),
        error,
        info,
    };
    Ok((jar, views::render(&template)?).into_response())
}

fn register_page_response(jar: SignedCookieJar, error: Option<String>) -> Result<Response, WebError> {
    let template = RegisterTemplate {
        nav: Nav::for_session(None),
        error,
    };
    Ok((jar, views::render(&template)?).into_response())
}

/// Login form page
///
/// A visitor who already holds a valid session is sent straight to their
/// role's home screen.
pub async fn login_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<AuthQuery>,
) -> Result<Response, WebError> {
    let (jar, existing) = session::current(&state.api, jar).await;
    if let Some(existing) = existing {
        return Ok((jar, Redirect::to(existing.role().home())).into_response());
    }

    login_page_response(jar, query.error, query.info)
}

/// Perform the login: exchange credentials for a token, validate it for the
/// role and name, store the session, and send the user to their home screen.
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    axum::Form(form): axum::Form<LoginForm>,
) -> Result<Response, WebError> {
    let email = form.email.trim();
    let password = form.password.trim();

    if email.is_empty() || password.is_empty() {
        return login_page_response(jar, Some("Введите email и пароль.".to_string()), None);
    }

    let login_result: Result<TokenResponse, _> = state
        .api
        .post(
            "/auth/login",
            None,
            &json!({ "email": email, "password": password }),
        )
        .await;

    let token = match login_result {
        Ok(response) => response.access_token,
        Err(err) => {
            warn!("login failed for {email}: {err}");
            let message = if err.to_string().contains("Подтвердите e-mail") {
                "Почта не подтверждена. Запросите письмо с кодом и завершите подтверждение."
            } else {
                "Неверный email или пароль. Попробуйте ещё раз."
            };
            return login_page_response(jar, Some(message.to_string()), None);
        }
    };

    let profile: MeResponse = match state.api.get("/auth/me", Some(&token)).await {
        Ok(profile) => profile,
        Err(err) => {
            warn!("identity check after login failed: {err}");
            return login_page_response(
                jar,
                Some("Не удалось проверить учётную запись. Попробуйте позже.".to_string()),
                None,
            );
        }
    };

    info!(role = profile.role.as_str(), "session created");

    let payload = SessionPayload {
        token,
        role: profile.role,
        full_name: profile.full_name,
    };
    let jar = session::create(jar, &payload, state.config.secure_cookies);

    Ok((jar, Redirect::to(payload.role.home())).into_response())
}

/// Registration form page
pub async fn register_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<AuthQuery>,
) -> Result<Response, WebError> {
    let (jar, existing) = session::current(&state.api, jar).await;
    if let Some(existing) = existing {
        return Ok((jar, Redirect::to(existing.role().home())).into_response());
    }

    register_page_response(jar, query.error)
}

/// Register a new pilot.
///
/// Depending on backend configuration this either returns a token right away
/// (session is created and the pilot lands on onboarding) or asks the user to
/// confirm their e-mail first.
pub async fn register(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    axum::Form(form): axum::Form<RegisterForm>,
) -> Result<Response, WebError> {
    let full_name = form.full_name.trim().to_string();
    let email = form.email.trim().to_string();
    let password = form.password.trim().to_string();
    // Optional fields become null so the backend does not store empty strings.
    let preferred_branch = form
        .preferred_branch
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let motivation = form
        .motivation
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    for check in [
        validation::validate_full_name(&full_name),
        validation::validate_email(&email),
        validation::validate_password(&password),
    ] {
        if let Err(message) = check {
            return register_page_response(jar, Some(message));
        }
    }

    let payload = json!({
        "full_name": full_name,
        "email": email,
        "password": password,
        "preferred_branch": preferred_branch,
        "motivation": motivation,
    });

    let outcome: RegisterOutcome = match state.api.post("/auth/register", None, &payload).await {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!("registration failed for {email}: {err}");
            return register_page_response(jar, Some(err.to_string()));
        }
    };

    match outcome {
        RegisterOutcome::Token(token) => {
            info!("pilot registered and confirmed immediately");
            let payload = SessionPayload {
                token: token.access_token,
                role: Role::Pilot,
                full_name,
            };
            let jar = session::create(jar, &payload, state.config.secure_cookies);
            Ok((jar, Redirect::to("/onboarding")).into_response())
        }
        RegisterOutcome::Pending {
            detail,
            debug_token,
        } => {
            let mut message =
                detail.unwrap_or_else(|| "Проверьте почту для подтверждения.".to_string());
            if let Some(code) = debug_token {
                message.push_str(&format!(" Код: {code}"));
            }
            login_page_response(jar, None, Some(message))
        }
    }
}

/// Logout: clear both cookies unconditionally and return to the login page
pub async fn logout(jar: SignedCookieJar) -> Response {
    let jar = session::destroy(jar);
    (jar, Redirect::to("/login")).into_response()
}
