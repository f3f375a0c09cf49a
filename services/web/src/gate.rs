//! Role gate for page handlers
//!
//! Gates return a discriminated result: either the validated session (plus
//! the cookie jar whose delta may contain a stale-cookie removal), or a
//! [`Denied`] redirect. Every combination of session state and required role
//! maps to a concrete destination, so no request is ever left unrouted.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;

use common::ApiClient;

use crate::session::{self, Role, Session};

/// The redirect half of a gate decision
pub struct Denied {
    jar: SignedCookieJar,
    target: &'static str,
}

impl Denied {
    pub fn target(&self) -> &'static str {
        self.target
    }
}

// The jar is not debuggable; the destination is the interesting part.
impl std::fmt::Debug for Denied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Denied").field("target", &self.target).finish()
    }
}

impl IntoResponse for Denied {
    fn into_response(self) -> Response {
        (self.jar, Redirect::to(self.target)).into_response()
    }
}

/// Require any valid session; unauthenticated requests go to the login page.
pub async fn require_session(
    api: &ApiClient,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Session), Denied> {
    let (jar, session) = session::current(api, jar).await;
    match session {
        Some(session) => Ok((jar, session)),
        None => Err(Denied {
            jar,
            target: "/login",
        }),
    }
}

/// Require a specific role.
///
/// A mismatched user is not shown an error page: they are redirected to
/// their own home screen (pilots to the dashboard, HR to the admin panel).
pub async fn require_role(
    api: &ApiClient,
    jar: SignedCookieJar,
    role: Role,
) -> Result<(SignedCookieJar, Session), Denied> {
    let (jar, session) = require_session(api, jar).await?;
    if session.role() != role {
        return Err(Denied {
            jar,
            target: session.role().home(),
        });
    }
    Ok((jar, session))
}

/// Require the pilot experience.
///
/// Passes pilots and HR users with the view-as-pilot overlay enabled; plain
/// HR sessions are bounced to the admin panel. Pilot-only form posts use
/// this so the overlay works without a second account.
pub async fn require_pilot_ui(
    api: &ApiClient,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Session), Denied> {
    let (jar, session) = require_session(api, jar).await?;
    if !session.sees_pilot_ui() {
        return Err(Denied {
            jar,
            target: Role::Hr.home(),
        });
    }
    Ok((jar, session))
}

#[cfg(test)]
mod tests {
    use crate::session::Role;

    #[test]
    fn test_role_home_mapping_is_total() {
        // The asymmetric redirects from the gate are this mapping: a pilot
        // denied the HR panel lands on "/", an HR user denied a pilot page
        // lands on "/admin".
        assert_eq!(Role::Pilot.home(), "/");
        assert_eq!(Role::Hr.home(), "/admin");
    }
}
