//! Canonical data model for the group and live-presentation engine.
//!
//! Everything here is plain data: owned entities (Group, LivePresentation,
//! UserPerformance, GroupTemplate), the values they exclusively own
//! (members, participants, polls, responses), and the derived read models
//! (PollResults, PresentationAnalytics, GroupReport) that are recomputed on
//! every read and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// GROUPS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Leader,
    #[default]
    Member,
    Observer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

/// Rolling per-group metrics. Zeroed at group creation; updated via
/// `update_group`, never derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GroupPerformanceMetrics {
    pub average_score: f64,
    pub completion_rate: f64,
    pub participation_rate: f64,
    pub total_sessions: u32,
    pub total_assessments: u32,
    pub trend: Trend,
}

/// A user's membership in a group. Owned exclusively by its Group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub performance_score: Option<f64>,
    pub last_activity: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub trainer_id: String,
    pub tenant_id: String,
    pub members: Vec<GroupMember>,
    pub max_size: Option<u32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub metrics: GroupPerformanceMetrics,
}

/// Input for `create_group`. Unset fields get the documented defaults
/// (`max_size` 20, category "General", empty tags).
#[derive(Debug, Clone, Deserialize)]
pub struct NewGroup {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub trainer_id: String,
    pub tenant_id: String,
    #[serde(default)]
    pub max_size: Option<u32>,
}

/// Partial update for `update_group`; only provided fields are merged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub max_size: Option<u32>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub metrics: Option<GroupPerformanceMetrics>,
}

// ============================================================================
// TEMPLATES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub max_size: u32,
    pub category: String,
    pub tags: Vec<String>,
    pub trainer_id: String,
    pub is_public: bool,
    pub usage_count: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub max_size: u32,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub trainer_id: String,
    #[serde(default)]
    pub is_public: bool,
}

// ============================================================================
// PRESENTATIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationStatus {
    Preparing,
    Live,
    Paused,
    Ended,
}

/// Attendance row for one user in a presentation. Leaving sets `left_at`
/// rather than deleting the row, so analytics keep the full record;
/// rejoining appends a fresh row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivePresentation {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub trainer_id: String,
    pub group_id: Option<String>,
    pub status: PresentationStatus,
    pub current_slide: u32,
    pub total_slides: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub participants: Vec<Participant>,
    pub polls: Vec<LivePoll>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPresentation {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub trainer_id: String,
    #[serde(default)]
    pub group_id: Option<String>,
    pub total_slides: u32,
}

/// Derived on read from a presentation snapshot; never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationAnalytics {
    pub total_participants: usize,
    pub active_participants: usize,
    pub poll_count: usize,
    pub total_responses: usize,
    pub average_poll_participation: f64,
    pub duration_secs: Option<i64>,
}

// ============================================================================
// POLLS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollType {
    MultipleChoice,
    TrueFalse,
    Rating,
    OpenEnded,
    WordCloud,
}

/// A poll answer. Untagged on the wire: a JSON string is `Text`, a number
/// is `Number`, an array of strings is `Multi`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    Number(f64),
    Multi(Vec<String>),
}

impl Answer {
    /// Canonical string key used to group answers when tallying results.
    pub fn key(&self) -> String {
        match self {
            Answer::Text(s) => s.clone(),
            Answer::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Answer::Multi(items) => items.join(", "),
        }
    }
}

/// Immutable once created; appended to a poll's response list, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollResponse {
    pub id: String,
    pub poll_id: String,
    pub user_id: String,
    pub answer: Answer,
    pub submitted_at: DateTime<Utc>,
    pub response_time_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivePoll {
    pub id: String,
    pub question: String,
    pub poll_type: PollType,
    pub options: Vec<String>,
    pub is_active: bool,
    pub time_limit_secs: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub responses: Vec<PollResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPoll {
    pub question: String,
    pub poll_type: PollType,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub time_limit_secs: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub user_id: String,
    pub answer: Answer,
    #[serde(default)]
    pub response_time_ms: Option<u64>,
}

/// One tallied answer value within `PollResults`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerCount {
    pub answer: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordWeight {
    pub word: String,
    pub weight: usize,
}

/// Derived on read from the response list; never stored authoritatively.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollResults {
    pub poll_id: String,
    pub total_responses: usize,
    /// Distinct responding users over participants currently present, as a
    /// percentage. Zero when nobody is present.
    pub participation_rate: f64,
    pub answers: Vec<AnswerCount>,
    pub average_rating: Option<f64>,
    pub open_responses: Option<Vec<String>>,
    pub word_cloud: Option<Vec<WordWeight>>,
    pub average_response_ms: Option<f64>,
}

// ============================================================================
// PERFORMANCE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Assessment,
    Participation,
    Attendance,
    Engagement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PerformanceMetrics {
    pub attendance_rate: f64,
    pub participation_score: f64,
    pub assessment_score: f64,
    pub engagement_level: f64,
    pub improvement_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub date: DateTime<Utc>,
    pub score: f64,
    pub kind: RecordKind,
    pub detail: Option<String>,
}

/// Per-user, per-group performance aggregate. Keyed by (user_id, group_id);
/// `history` is append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPerformance {
    pub user_id: String,
    pub group_id: String,
    pub metrics: PerformanceMetrics,
    pub history: Vec<PerformanceRecord>,
    pub last_updated: DateTime<Utc>,
}

/// Partial metrics update; only provided fields overwrite (merge semantics).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsUpdate {
    #[serde(default)]
    pub attendance_rate: Option<f64>,
    #[serde(default)]
    pub participation_score: Option<f64>,
    #[serde(default)]
    pub assessment_score: Option<f64>,
    #[serde(default)]
    pub engagement_level: Option<f64>,
    #[serde(default)]
    pub improvement_rate: Option<f64>,
    #[serde(default)]
    pub detail: Option<String>,
}

// ============================================================================
// REPORTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

/// Point-in-time group rollup; pure function of store state apart from
/// `generated_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupReport {
    pub group_id: String,
    pub period: ReportPeriod,
    pub generated_at: DateTime<Utc>,
    pub total_members: usize,
    pub active_members: usize,
    pub average_performance: f64,
    pub top_performers: Vec<String>,
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_deserializes_untagged() {
        let text: Answer = serde_json::from_str("\"Yes\"").unwrap();
        assert_eq!(text, Answer::Text("Yes".into()));

        let number: Answer = serde_json::from_str("4.5").unwrap();
        assert_eq!(number, Answer::Number(4.5));

        let multi: Answer = serde_json::from_str("[\"a\", \"b\"]").unwrap();
        assert_eq!(multi, Answer::Multi(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn answer_key_formats_whole_numbers_without_decimals() {
        assert_eq!(Answer::Number(4.0).key(), "4");
        assert_eq!(Answer::Number(3.5).key(), "3.5");
        assert_eq!(Answer::Text("No".into()).key(), "No");
        assert_eq!(Answer::Multi(vec!["x".into(), "y".into()]).key(), "x, y");
    }

    #[test]
    fn enums_use_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&PollType::MultipleChoice).unwrap(),
            "\"multiple_choice\""
        );
        assert_eq!(
            serde_json::to_string(&PresentationStatus::Preparing).unwrap(),
            "\"preparing\""
        );
        assert_eq!(serde_json::to_string(&Trend::Stable).unwrap(), "\"stable\"");
    }
}
