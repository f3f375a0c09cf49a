//! DTOs for backend responses
//!
//! These mirror the backend's response schemas. The backend owns every one of
//! these entities; this service only deserializes and displays them, so the
//! structs carry exactly the fields the pages render.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::session::Role;

/// Response of `POST /auth/login` and auto-confirm registration
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Response of `GET /auth/me`
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub full_name: String,
    pub role: Role,
}

/// Registration either yields a token (auto-confirm mode) or a hint to
/// confirm the e-mail first, optionally with a debug code in dev setups.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RegisterOutcome {
    Token(TokenResponse),
    Pending {
        detail: Option<String>,
        debug_token: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompetencyBase {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCompetency {
    pub competency: CompetencyBase,
    pub level: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserArtifact {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub rarity: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Response of `GET /api/me`
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub full_name: String,
    pub xp: i64,
    pub mana: i64,
    pub current_rank_id: Option<i64>,
    #[serde(default)]
    pub profile_photo_uploaded: bool,
    pub competencies: Vec<UserCompetency>,
    pub artifacts: Vec<UserArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rank {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub required_xp: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MissionSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub xp_reward: i64,
    pub mana_reward: i64,
    pub difficulty: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MissionCompetencyReward {
    pub competency_id: i64,
    pub competency_name: String,
    pub level_delta: i64,
}

/// Response of `GET /api/missions/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct MissionDetail {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub xp_reward: i64,
    pub mana_reward: i64,
    pub difficulty: String,
    pub is_active: bool,
    pub minimum_rank_id: Option<i64>,
    pub artifact_id: Option<i64>,
    #[serde(default)]
    pub prerequisites: Vec<i64>,
    #[serde(default)]
    pub competency_rewards: Vec<MissionCompetencyReward>,
}

/// A pilot's submission as both the mission page and the admin panel see it
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub id: Option<i64>,
    pub mission_id: i64,
    pub status: String,
    pub comment: Option<String>,
    pub proof_url: Option<String>,
    pub awarded_xp: i64,
    pub awarded_mana: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JournalEntry {
    pub id: i64,
    pub event_type: String,
    pub title: String,
    pub description: String,
    pub xp_delta: i64,
    pub mana_delta: i64,
    pub created_at: DateTime<Utc>,
}

/// A row of `GET /api/leaderboard`
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardRow {
    pub user_id: i64,
    pub full_name: String,
    pub rank_title: Option<String>,
    pub xp: i64,
    pub mana: i64,
    pub completed_missions: i64,
    #[serde(default)]
    pub competencies: Vec<UserCompetency>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub cost_mana: i64,
    pub stock: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingSlide {
    pub id: i64,
    pub order: i64,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub cta_text: Option<String>,
    #[serde(default)]
    pub cta_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingState {
    pub last_completed_order: i64,
    pub is_completed: bool,
}

/// Response of `GET /api/onboarding/`
#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingOverview {
    pub slides: Vec<OnboardingSlide>,
    pub state: OnboardingState,
    pub next_order: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressRank {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub required_xp: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressXpMetrics {
    pub baseline: i64,
    pub current: i64,
    pub target: i64,
    pub remaining: i64,
    pub progress_percent: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressMissionRequirement {
    pub mission_id: i64,
    pub mission_title: String,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressCompetencyRequirement {
    pub competency_id: i64,
    pub competency_name: String,
    pub required_level: i64,
    pub current_level: i64,
    pub is_met: bool,
}

/// Response of `GET /api/progress`
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressSnapshot {
    pub current_rank: Option<ProgressRank>,
    pub next_rank: Option<ProgressRank>,
    pub xp: ProgressXpMetrics,
    pub mission_requirements: Vec<ProgressMissionRequirement>,
    pub competency_requirements: Vec<ProgressCompetencyRequirement>,
    pub completed_missions: i64,
    pub total_missions: i64,
    pub met_competencies: i64,
    pub total_competencies: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchMission {
    pub mission_id: i64,
    pub mission_title: String,
    pub order: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Branch {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub missions: Vec<BranchMission>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Competency {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionStats {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchCompletionStat {
    pub branch_id: i64,
    pub branch_title: String,
    pub completion_rate: f64,
}

/// Response of `GET /api/admin/stats`
#[derive(Debug, Clone, Deserialize)]
pub struct AdminStats {
    pub total_users: i64,
    pub active_pilots: i64,
    pub average_completed_missions: f64,
    pub submission_stats: SubmissionStats,
    pub branch_completion: Vec<BranchCompletionStat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_outcome_token_variant() {
        let outcome: RegisterOutcome =
            serde_json::from_str(r#"{"access_token": "abc", "token_type": "bearer"}"#)
                .expect("token response parses");
        assert!(matches!(outcome, RegisterOutcome::Token(t) if t.access_token == "abc"));
    }

    #[test]
    fn test_register_outcome_pending_variant() {
        let outcome: RegisterOutcome = serde_json::from_str(
            r#"{"detail": "Проверьте почту", "debug_token": "123456"}"#,
        )
        .expect("pending response parses");

        match outcome {
            RegisterOutcome::Pending {
                detail,
                debug_token,
            } => {
                assert_eq!(detail.as_deref(), Some("Проверьте почту"));
                assert_eq!(debug_token.as_deref(), Some("123456"));
            }
            RegisterOutcome::Token(_) => panic!("expected pending"),
        }
    }

    #[test]
    fn test_me_response_role_is_lowercase() {
        let me: MeResponse =
            serde_json::from_str(r#"{"full_name": "Zaphod", "role": "hr"}"#).expect("parses");
        assert_eq!(me.role, Role::Hr);
    }

    #[test]
    fn test_profile_defaults_for_missing_photo_flag() {
        let profile: UserProfile = serde_json::from_str(
            r#"{
                "full_name": "Ford Prefect",
                "xp": 120,
                "mana": 40,
                "current_rank_id": null,
                "competencies": [],
                "artifacts": []
            }"#,
        )
        .expect("profile parses without the photo flag");
        assert!(!profile.profile_photo_uploaded);
    }
}
