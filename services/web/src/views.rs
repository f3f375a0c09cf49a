//! Askama templates and the session-dependent navigation

use askama::Template;
use axum::response::Html;

use crate::models::{
    AdminStats, Branch, Competency, JournalEntry, LeaderboardRow, MissionDetail, MissionSummary,
    OnboardingOverview, ProgressSnapshot, Rank, StoreItem, Submission, UserArtifact, UserProfile,
};
use crate::session::{Persona, Session};

/// A single navigation entry
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
}

/// Header state rendered on every page
pub struct Nav {
    pub links: Vec<NavLink>,
    pub viewing_as_pilot: bool,
    pub user_name: Option<String>,
}

impl Nav {
    /// Compose the menu for the current session state.
    ///
    /// Anonymous visitors only see the login link; plain HR gets the admin
    /// menu plus the view-as entry point; everyone seeing the pilot UI gets
    /// the pilot menu, with a "return to HR" escape hatch when the pilot UI
    /// is the overlay rather than a pilot account.
    pub fn for_session(session: Option<&Session>) -> Self {
        let Some(session) = session else {
            return Nav {
                links: vec![NavLink {
                    href: "/login",
                    label: "Войти",
                }],
                viewing_as_pilot: false,
                user_name: None,
            };
        };

        let mut viewing_as_pilot = false;
        let mut links = match session.persona() {
            Persona::Hr => vec![
                NavLink {
                    href: "/admin",
                    label: "HR панель",
                },
                NavLink {
                    href: "/leaderboard",
                    label: "Лидерборд",
                },
                NavLink {
                    href: "/admin/view-as",
                    label: "Просмотр от лица пилота",
                },
            ],
            persona => {
                viewing_as_pilot = persona == Persona::HrViewingAsPilot;
                let mut links = vec![
                    NavLink {
                        href: "/onboarding",
                        label: "Онбординг",
                    },
                    NavLink {
                        href: "/missions",
                        label: "Миссии",
                    },
                    NavLink {
                        href: "/journal",
                        label: "Журнал",
                    },
                    NavLink {
                        href: "/store",
                        label: "Магазин",
                    },
                    NavLink {
                        href: "/leaderboard",
                        label: "Лидерборд",
                    },
                    NavLink {
                        href: "/profile",
                        label: "Профиль",
                    },
                ];
                if viewing_as_pilot {
                    links.push(NavLink {
                        href: "/admin/exit-view",
                        label: "Вернуться к HR",
                    });
                }
                links
            }
        };

        links.shrink_to_fit();
        Nav {
            links,
            viewing_as_pilot,
            user_name: Some(session.full_name.clone()),
        }
    }
}

/// Render a template into an HTML response body
pub fn render<T: Template>(template: &T) -> Result<Html<String>, askama::Error> {
    Ok(Html(template.render()?))
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub info: Option<String>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub nav: Nav,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub nav: Nav,
    pub profile: UserProfile,
    pub current_rank: Option<Rank>,
    pub next_rank: Option<Rank>,
    pub xp_progress: i64,
    pub xp_target: i64,
}

#[derive(Template)]
#[template(path = "onboarding.html")]
pub struct OnboardingTemplate {
    pub nav: Nav,
    pub overview: OnboardingOverview,
}

#[derive(Template)]
#[template(path = "missions.html")]
pub struct MissionsTemplate {
    pub nav: Nav,
    pub missions: Vec<MissionSummary>,
}

#[derive(Template)]
#[template(path = "mission_detail.html")]
pub struct MissionDetailTemplate {
    pub nav: Nav,
    pub mission: MissionDetail,
    pub submission: Option<Submission>,
    pub status: Option<String>,
}

#[derive(Template)]
#[template(path = "journal.html")]
pub struct JournalTemplate {
    pub nav: Nav,
    pub entries: Vec<JournalEntry>,
}

#[derive(Template)]
#[template(path = "store.html")]
pub struct StoreTemplate {
    pub nav: Nav,
    pub items: Vec<StoreItem>,
    pub error: Option<String>,
    pub info: Option<String>,
}

#[derive(Template)]
#[template(path = "leaderboard.html")]
pub struct LeaderboardTemplate {
    pub nav: Nav,
    pub rows: Vec<LeaderboardRow>,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub nav: Nav,
    pub profile: UserProfile,
    pub applied_artifacts: Vec<UserArtifact>,
    pub progress: ProgressSnapshot,
    pub public_base_url: String,
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub nav: Nav,
    pub stats: AdminStats,
    pub submissions: Vec<Submission>,
    pub missions: Vec<MissionSummary>,
    pub branches: Vec<Branch>,
    pub ranks: Vec<Rank>,
    pub competencies: Vec<Competency>,
    pub artifacts: Vec<UserArtifact>,
    pub store_items: Vec<StoreItem>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub nav: Nav,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;

    fn session_for(role: Role, view_as_pilot: bool) -> Session {
        // Personas are combined the same way the validator does it.
        let persona = Persona::for_role(role, view_as_pilot);
        Session::test_only("token".to_string(), "Test User".to_string(), persona)
    }

    #[test]
    fn test_anonymous_nav_is_login_only() {
        let nav = Nav::for_session(None);
        assert_eq!(nav.links.len(), 1);
        assert_eq!(nav.links[0].href, "/login");
        assert!(nav.user_name.is_none());
        assert!(!nav.viewing_as_pilot);
    }

    #[test]
    fn test_hr_nav_has_view_as_entry() {
        let session = session_for(Role::Hr, false);
        let nav = Nav::for_session(Some(&session));

        assert!(nav.links.iter().any(|l| l.href == "/admin/view-as"));
        assert!(!nav.viewing_as_pilot);
    }

    #[test]
    fn test_overlay_nav_is_pilot_menu_with_escape_hatch() {
        let session = session_for(Role::Hr, true);
        let nav = Nav::for_session(Some(&session));

        assert!(nav.viewing_as_pilot);
        assert!(nav.links.iter().any(|l| l.href == "/missions"));
        assert!(nav.links.iter().any(|l| l.href == "/admin/exit-view"));
        assert!(!nav.links.iter().any(|l| l.href == "/admin/view-as"));
    }

    #[test]
    fn test_pilot_nav_has_no_admin_entries() {
        let session = session_for(Role::Pilot, false);
        let nav = Nav::for_session(Some(&session));

        assert!(!nav.viewing_as_pilot);
        assert!(nav.links.iter().all(|l| !l.href.starts_with("/admin")));
    }

    #[test]
    fn test_error_template_renders() {
        let template = ErrorTemplate {
            nav: Nav::for_session(None),
            message: "backend returned 502: upstream unavailable".to_string(),
        };
        let html = template.render().expect("error template renders");
        assert!(html.contains("upstream unavailable"));
    }
}
