//! HTTP client wrapper for the REST backend
//!
//! This is the sole integration point between rendered pages and the backend.
//! It attaches the bearer token when one is supplied, keeps JSON and
//! multipart bodies apart, and normalizes every non-success response into an
//! [`ApiError`] carrying the backend's own message.

use reqwest::multipart::Form;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

/// Client for the backend REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client from the API configuration
    pub fn new(config: &ApiConfig) -> Self {
        Self::from_base_url(config.internal_base_url.clone())
    }

    /// Create a new client against an explicit base URL
    pub fn from_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a JSON resource
    pub async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> ApiResult<T> {
        let req = self.http.get(self.url(path));
        let response = self.execute(req, token).await?;
        Self::decode(response).await
    }

    /// POST a JSON body and decode a JSON response
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> ApiResult<T> {
        let req = self.http.post(self.url(path)).json(body);
        let response = self.execute(req, token).await?;
        Self::decode(response).await
    }

    /// POST a JSON body where the response carries no payload (200/204)
    pub async fn post_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> ApiResult<()> {
        let req = self.http.post(self.url(path)).json(body);
        self.execute(req, token).await?;
        Ok(())
    }

    /// POST a multipart form and decode a JSON response
    ///
    /// reqwest sets the `multipart/form-data` boundary header itself; no
    /// JSON content-type is ever attached on this path.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        form: Form,
    ) -> ApiResult<T> {
        let req = self.http.post(self.url(path)).multipart(form);
        let response = self.execute(req, token).await?;
        Self::decode(response).await
    }

    /// DELETE a resource, ignoring any response payload
    pub async fn delete(&self, path: &str, token: Option<&str>) -> ApiResult<()> {
        let req = self.http.delete(self.url(path));
        self.execute(req, token).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send the request and turn any non-success response into an error
    async fn execute(&self, req: RequestBuilder, token: Option<&str>) -> ApiResult<Response> {
        let req = match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        let response = req.send().await.map_err(ApiError::Network)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = normalize_error_body(status, &body);
        warn!(status = status.as_u16(), "backend rejected request");

        Err(ApiError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        response.json::<T>().await.map_err(ApiError::Decode)
    }
}

/// Extract a human-readable message from an error response body.
///
/// The backend is FastAPI-shaped and usually answers `{"detail": "..."}`;
/// `message` and `error` keys are accepted for completeness, and anything
/// unparseable is surfaced verbatim.
fn normalize_error_body(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }

    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_detail_field() {
        let message =
            normalize_error_body(StatusCode::UNAUTHORIZED, r#"{"detail": "Token expired"}"#);
        assert_eq!(message, "Token expired");
    }

    #[test]
    fn test_error_body_message_and_error_fields() {
        let message = normalize_error_body(StatusCode::BAD_REQUEST, r#"{"message": "Bad input"}"#);
        assert_eq!(message, "Bad input");

        let message = normalize_error_body(StatusCode::BAD_REQUEST, r#"{"error": "Nope"}"#);
        assert_eq!(message, "Nope");
    }

    #[test]
    fn test_error_body_raw_text_fallback() {
        let message = normalize_error_body(StatusCode::BAD_GATEWAY, "upstream unavailable");
        assert_eq!(message, "upstream unavailable");
    }

    #[test]
    fn test_error_body_empty_falls_back_to_status() {
        let message = normalize_error_body(StatusCode::NOT_FOUND, "");
        assert_eq!(message, "Not Found");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::from_base_url("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/auth/me"), "http://localhost:8000/auth/me");
    }
}
