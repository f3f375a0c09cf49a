//! Custom error types for the web service

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use common::ApiError;

use crate::gate::Denied;
use crate::views::{ErrorTemplate, Nav};

/// Custom error type for page handlers
#[derive(Debug, Error)]
pub enum WebError {
    /// The role gate redirected the request
    #[error("redirected to {}", .0.target())]
    Denied(Denied),

    /// A backend call failed; the backend's message is shown to the user
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The submitted form could not be read
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Template rendering failed
    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),
}

impl From<Denied> for WebError {
    fn from(denied: Denied) -> Self {
        WebError::Denied(denied)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::Denied(denied) => denied.into_response(),
            WebError::Api(err) => {
                error!("backend call failed: {err}");
                error_page(StatusCode::BAD_GATEWAY, err.to_string())
            }
            WebError::BadRequest(message) => error_page(StatusCode::BAD_REQUEST, message),
            WebError::Render(err) => {
                error!("template rendering failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Не удалось отобразить страницу.",
                )
                    .into_response()
            }
        }
    }
}

fn error_page(status: StatusCode, message: String) -> Response {
    let template = ErrorTemplate {
        nav: Nav::for_session(None),
        message,
    };

    match template.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(err) => {
            error!("error page rendering failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}
