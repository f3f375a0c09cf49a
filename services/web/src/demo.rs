//! Demo-account token cache
//!
//! Demo-friendly pages fall back to a shared demo login when the visitor has
//! no session. The tokens are cached per role with an explicit TTL so a cold
//! start or an expired token simply triggers a refetch. The cache lives in
//! [`crate::state::AppState`], never in module-global state, which keeps
//! tests and concurrent cold starts deterministic. It is a convenience cache
//! for anonymous browsing; gated pages never touch it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use tokio::sync::Mutex;
use tracing::info;

use common::{ApiClient, ApiResult};

use crate::config::WebConfig;
use crate::models::TokenResponse;
use crate::session::Role;

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    fetched_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Per-role cache of demo bearer tokens
#[derive(Clone)]
pub struct DemoTokenCache {
    ttl: Duration,
    pilot: Arc<Mutex<Option<CachedToken>>>,
    hr: Arc<Mutex<Option<CachedToken>>>,
}

impl DemoTokenCache {
    /// Create a new cache; tokens older than `ttl` are refetched
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            pilot: Arc::new(Mutex::new(None)),
            hr: Arc::new(Mutex::new(None)),
        }
    }

    /// Fetch the demo token for a role, logging in on a miss
    pub async fn token(
        &self,
        api: &ApiClient,
        config: &WebConfig,
        role: Role,
    ) -> ApiResult<String> {
        let slot = match role {
            Role::Pilot => &self.pilot,
            Role::Hr => &self.hr,
        };

        let mut guard = slot.lock().await;
        if let Some(cached) = guard.as_ref() {
            if cached.is_fresh(self.ttl) {
                return Ok(cached.token.clone());
            }
        }

        let (email, password) = config.demo_credentials(role);
        info!(role = role.as_str(), "refreshing demo token");

        let response: TokenResponse = api
            .post(
                "/auth/login",
                None,
                &json!({ "email": email, "password": password }),
            )
            .await?;

        *guard = Some(CachedToken {
            token: response.access_token.clone(),
            fetched_at: Instant::now(),
        });

        Ok(response.access_token)
    }

    /// Drop both cached tokens
    pub async fn invalidate(&self) {
        *self.pilot.lock().await = None;
        *self.hr.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_freshness() {
        let cached = CachedToken {
            token: "token".to_string(),
            fetched_at: Instant::now(),
        };

        assert!(cached.is_fresh(Duration::from_secs(600)));
        assert!(!cached.is_fresh(Duration::ZERO));
    }

    #[tokio::test]
    async fn test_invalidate_clears_both_slots() {
        let cache = DemoTokenCache::new(Duration::from_secs(600));
        *cache.pilot.lock().await = Some(CachedToken {
            token: "pilot".to_string(),
            fetched_at: Instant::now(),
        });
        *cache.hr.lock().await = Some(CachedToken {
            token: "hr".to_string(),
            fetched_at: Instant::now(),
        });

        cache.invalidate().await;

        assert!(cache.pilot.lock().await.is_none());
        assert!(cache.hr.lock().await.is_none());
    }
}
