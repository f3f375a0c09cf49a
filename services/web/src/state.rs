//! Application state shared across handlers

use std::time::Duration;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use common::{ApiClient, ApiConfig};

use crate::config::WebConfig;
use crate::demo::DemoTokenCache;

/// How long a cached demo token is reused before logging in again
const DEMO_TOKEN_TTL: Duration = Duration::from_secs(600);

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub config: WebConfig,
    /// Backend base URL embedded into pages for backend-hosted assets
    pub public_base_url: String,
    pub demo_tokens: DemoTokenCache,
    cookie_key: Key,
}

impl AppState {
    /// Build the state from the two configuration structs
    pub fn new(api_config: &ApiConfig, config: WebConfig) -> Self {
        let cookie_key = config.cookie_key();

        Self {
            api: ApiClient::new(api_config),
            public_base_url: api_config.public_base_url.clone(),
            demo_tokens: DemoTokenCache::new(DEMO_TOKEN_TTL),
            config,
            cookie_key,
        }
    }
}

// Required by the signed cookie jar extractor.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.cookie_key.clone()
    }
}
