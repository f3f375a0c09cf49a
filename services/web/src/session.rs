//! Session cookie codec and validator
//!
//! The session is a small signed, HTTP-only cookie carrying the bearer token,
//! the role and the display name. Every server render re-validates the token
//! against the backend's identity endpoint before trusting any field, so a
//! stale session never survives longer than one request. A second cookie
//! holds the HR-only "view as pilot" overlay flag.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use tracing::warn;

use common::ApiClient;

use crate::models::MeResponse;

/// Cookie names live in one place so reads and deletions cannot diverge.
pub const SESSION_COOKIE: &str = "alabuga_session";
pub const VIEW_COOKIE: &str = "alabuga_view_as";

const SESSION_MAX_AGE: time::Duration = time::Duration::hours(12);
const VIEW_MAX_AGE: time::Duration = time::Duration::hours(1);

/// User role as the backend reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Pilot,
    Hr,
}

impl Role {
    /// Default screen for a logged-in user of this role
    pub fn home(self) -> &'static str {
        match self {
            Role::Pilot => "/",
            Role::Hr => "/admin",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Pilot => "pilot",
            Role::Hr => "hr",
        }
    }
}

/// The legal viewing states of an authenticated user.
///
/// The overlay flag only exists for HR, so a pilot combined with
/// "viewing as pilot" is unrepresentable rather than merely forbidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    Pilot,
    Hr,
    HrViewingAsPilot,
}

impl Persona {
    /// Combine the cookie role with the overlay flag.
    ///
    /// The view cookie is ignored for pilot payloads.
    pub fn for_role(role: Role, view_as_pilot: bool) -> Self {
        match role {
            Role::Pilot => Persona::Pilot,
            Role::Hr if view_as_pilot => Persona::HrViewingAsPilot,
            Role::Hr => Persona::Hr,
        }
    }

    /// The authenticated role behind this persona
    pub fn role(self) -> Role {
        match self {
            Persona::Pilot => Role::Pilot,
            Persona::Hr | Persona::HrViewingAsPilot => Role::Hr,
        }
    }

    /// Whether pages should render the pilot experience
    pub fn sees_pilot_ui(self) -> bool {
        !matches!(self, Persona::Hr)
    }
}

/// The cookie-encoded session record.
///
/// Serialized as JSON (`fullName` camel case) and base64-wrapped before it
/// goes into the signed cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPayload {
    pub token: String,
    pub role: Role,
    #[serde(rename = "fullName")]
    pub full_name: String,
}

/// A validated session as handlers see it
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub full_name: String,
    persona: Persona,
}

impl Session {
    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn role(&self) -> Role {
        self.persona.role()
    }

    pub fn sees_pilot_ui(&self) -> bool {
        self.persona.sees_pilot_ui()
    }
}

#[cfg(test)]
impl Session {
    pub(crate) fn test_only(token: String, full_name: String, persona: Persona) -> Self {
        Self {
            token,
            full_name,
            persona,
        }
    }
}

/// Parse the session cookie without ever failing.
///
/// A missing cookie, a bad signature (rejected by the jar itself),
/// undecodable base64 and malformed JSON all read as "no session".
fn parse_payload(jar: &SignedCookieJar) -> Option<SessionPayload> {
    let cookie = jar.get(SESSION_COOKIE)?;
    let bytes = match URL_SAFE_NO_PAD.decode(cookie.value()) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("failed to decode session cookie: {err}");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(payload) => Some(payload),
        Err(err) => {
            warn!("failed to parse session cookie: {err}");
            None
        }
    }
}

/// Read and re-validate the current session.
///
/// If a token is present, one round-trip to `/auth/me` decides whether it is
/// still trusted. Expired and invalid tokens, unconfirmed accounts, backend
/// errors and network failures all fail closed: the cookie is dropped in the
/// returned jar delta and the caller sees no session. The view-as-pilot flag
/// is folded in on success.
pub async fn current(api: &ApiClient, jar: SignedCookieJar) -> (SignedCookieJar, Option<Session>) {
    let Some(payload) = parse_payload(&jar) else {
        return (jar, None);
    };

    match api.get::<MeResponse>("/auth/me", Some(&payload.token)).await {
        Ok(_) => {
            let view_as_pilot = jar
                .get(VIEW_COOKIE)
                .map(|c| c.value() == "pilot")
                .unwrap_or(false);
            let persona = Persona::for_role(payload.role, view_as_pilot);

            let session = Session {
                token: payload.token,
                full_name: payload.full_name,
                persona,
            };
            (jar, Some(session))
        }
        Err(err) => {
            warn!("session validation failed, dropping cookie: {err}");
            (jar.remove(removal(SESSION_COOKIE)), None)
        }
    }
}

/// Store a fresh session and clear any leftover overlay flag.
///
/// The JSON payload is base64-wrapped because display names are Cyrillic:
/// a raw non-ASCII cookie value cannot survive the `Cookie` header and the
/// jar would silently drop it on the next request.
///
/// Any new login resets the view-as-pilot state so it can never leak across
/// sessions.
pub fn create(jar: SignedCookieJar, payload: &SessionPayload, secure: bool) -> SignedCookieJar {
    let json = serde_json::to_string(payload).expect("session payload serializes to JSON");
    let value = URL_SAFE_NO_PAD.encode(json);

    jar.add(build_cookie(SESSION_COOKIE, value, secure, SESSION_MAX_AGE))
        .remove(removal(VIEW_COOKIE))
}

/// Delete both cookies unconditionally
pub fn destroy(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(removal(SESSION_COOKIE))
        .remove(removal(VIEW_COOKIE))
}

/// Turn on the HR view-as-pilot overlay.
///
/// Role checks belong to the gate; this only writes the flag.
pub fn enable_pilot_view(jar: SignedCookieJar, secure: bool) -> SignedCookieJar {
    jar.add(build_cookie(VIEW_COOKIE, "pilot".to_string(), secure, VIEW_MAX_AGE))
}

/// Turn the overlay off
pub fn disable_pilot_view(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(removal(VIEW_COOKIE))
}

fn build_cookie(
    name: &'static str,
    value: String,
    secure: bool,
    max_age: time::Duration,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .path("/")
        .max_age(max_age)
        .build()
}

/// Removal cookie with the same path the live cookie was set on
fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Key;

    fn payload() -> SessionPayload {
        SessionPayload {
            token: "deep-thought-42".to_string(),
            role: Role::Hr,
            full_name: "Trillian Astra".to_string(),
        }
    }

    #[test]
    fn test_pilot_never_gets_the_overlay_persona() {
        assert_eq!(Persona::for_role(Role::Pilot, true), Persona::Pilot);
        assert_eq!(Persona::for_role(Role::Pilot, false), Persona::Pilot);
        assert_eq!(Persona::for_role(Role::Hr, true), Persona::HrViewingAsPilot);
        assert_eq!(Persona::for_role(Role::Hr, false), Persona::Hr);
    }

    #[test]
    fn test_persona_visibility() {
        assert!(Persona::Pilot.sees_pilot_ui());
        assert!(Persona::HrViewingAsPilot.sees_pilot_ui());
        assert!(!Persona::Hr.sees_pilot_ui());
        assert_eq!(Persona::HrViewingAsPilot.role(), Role::Hr);
    }

    #[test]
    fn test_malformed_cookie_parses_to_none() {
        let jar = SignedCookieJar::new(Key::generate())
            .add(Cookie::build((SESSION_COOKIE, "{not valid json")).path("/").build());

        assert!(parse_payload(&jar).is_none());
    }

    #[test]
    fn test_payload_round_trip_through_jar() {
        let jar = create(SignedCookieJar::new(Key::generate()), &payload(), false);

        let parsed = parse_payload(&jar).expect("freshly created session parses");
        assert_eq!(parsed.token, "deep-thought-42");
        assert_eq!(parsed.role, Role::Hr);
        assert_eq!(parsed.full_name, "Trillian Astra");
    }

    #[test]
    fn test_cyrillic_name_yields_an_ascii_cookie_value() {
        // Non-ASCII cookie values do not survive the Cookie header, so the
        // encoded form must be plain ASCII for every display name.
        let payload = SessionPayload {
            token: "deep-thought-42".to_string(),
            role: Role::Pilot,
            full_name: "Тестовый Пилот".to_string(),
        };
        let jar = create(SignedCookieJar::new(Key::generate()), &payload, false);

        let cookie = jar.get(SESSION_COOKIE).expect("session cookie present");
        assert!(cookie.value().is_ascii());

        let parsed = parse_payload(&jar).expect("cyrillic payload parses back");
        assert_eq!(parsed.full_name, "Тестовый Пилот");
    }

    #[test]
    fn test_create_clears_the_view_cookie() {
        let jar = enable_pilot_view(SignedCookieJar::new(Key::generate()), false);
        assert!(jar.get(VIEW_COOKIE).is_some());

        let jar = create(jar, &payload(), false);
        assert!(jar.get(VIEW_COOKIE).is_none());
    }

    #[test]
    fn test_destroy_removes_both_cookies() {
        let jar = SignedCookieJar::new(Key::generate());
        let jar = enable_pilot_view(create(jar, &payload(), false), false);

        let jar = destroy(jar);
        assert!(jar.get(SESSION_COOKIE).is_none());
        assert!(jar.get(VIEW_COOKIE).is_none());
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = build_cookie(SESSION_COOKIE, "value".to_string(), true, SESSION_MAX_AGE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(SESSION_MAX_AGE));
    }
}
