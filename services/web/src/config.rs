//! Web service configuration

use axum_extra::extract::cookie::Key;
use std::env;
use tracing::warn;

use crate::session::Role;

/// Development-only fallback secret. Deployments must set SESSION_SECRET.
const DEV_SESSION_SECRET: &str = "alabuga-mission-control-dev-secret-change-me-before-launch";

/// Web service configuration struct
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Address the HTTP server binds to
    pub listen_addr: String,
    /// Secret the session cookies are signed with
    pub session_secret: String,
    /// Whether cookies carry the `Secure` attribute
    pub secure_cookies: bool,
    /// Demo pilot account credentials
    pub demo_pilot_email: String,
    pub demo_pilot_password: String,
    /// Demo HR account credentials
    pub demo_hr_email: String,
    pub demo_hr_password: String,
}

impl WebConfig {
    /// Create a new WebConfig from environment variables
    pub fn from_env() -> Self {
        let listen_addr =
            env::var("WEB_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let session_secret = match env::var("SESSION_SECRET") {
            // Key derivation needs at least 32 bytes of material.
            Ok(secret) if secret.len() >= 32 => secret,
            Ok(_) => {
                warn!("SESSION_SECRET is shorter than 32 bytes, using the development secret");
                DEV_SESSION_SECRET.to_string()
            }
            Err(_) => DEV_SESSION_SECRET.to_string(),
        };

        let secure_cookies = env::var("SECURE_COOKIES")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let demo_pilot_email =
            env::var("DEMO_PILOT_EMAIL").unwrap_or_else(|_| "candidate@alabuga.space".to_string());
        let demo_pilot_password =
            env::var("DEMO_PILOT_PASSWORD").unwrap_or_else(|_| "orbita123".to_string());
        let demo_hr_email =
            env::var("DEMO_HR_EMAIL").unwrap_or_else(|_| "hr@alabuga.space".to_string());
        let demo_hr_password =
            env::var("DEMO_HR_PASSWORD").unwrap_or_else(|_| "orbita123".to_string());

        Self {
            listen_addr,
            session_secret,
            secure_cookies,
            demo_pilot_email,
            demo_pilot_password,
            demo_hr_email,
            demo_hr_password,
        }
    }

    /// Derive the cookie-signing key from the configured secret
    pub fn cookie_key(&self) -> Key {
        Key::derive_from(self.session_secret.as_bytes())
    }

    /// Demo-account credentials for the given role
    pub fn demo_credentials(&self, role: Role) -> (&str, &str) {
        match role {
            Role::Pilot => (&self.demo_pilot_email, &self.demo_pilot_password),
            Role::Hr => (&self.demo_hr_email, &self.demo_hr_password),
        }
    }
}
