//! Report generator: point-in-time group rollups.
//!
//! Pure function of a store snapshot plus the requested period. Apart from
//! `generated_at`, identical inputs produce identical reports.

use chrono::Utc;

use crate::engine::performance::{top_performers, IMPROVEMENT_THRESHOLD};
use crate::engine::types::{Group, GroupReport, MemberStatus, ReportPeriod, Trend, UserPerformance};

const TOP_PERFORMER_LIMIT: usize = 3;
const LOW_PARTICIPATION: f64 = 60.0;
const LOW_ATTENDANCE: f64 = 75.0;

/// Build a report for one group from its per-user performance records.
/// `perfs` must already be filtered to this group.
pub fn generate_group_report(
    group: &Group,
    perfs: &[UserPerformance],
    period: ReportPeriod,
) -> GroupReport {
    let total_members = group.members.len();
    let active_members = group
        .members
        .iter()
        .filter(|m| m.status == MemberStatus::Active)
        .count();

    // Mean of per-user assessment scores; the group's own stored average is
    // the fallback when no per-user data exists yet.
    let average_performance = if perfs.is_empty() {
        group.metrics.average_score
    } else {
        let sum: f64 = perfs.iter().map(|p| p.metrics.assessment_score).sum();
        sum / perfs.len() as f64
    };

    let top = top_performers(perfs, TOP_PERFORMER_LIMIT)
        .into_iter()
        .map(|p| p.user_id)
        .collect();

    GroupReport {
        group_id: group.id.clone(),
        period,
        generated_at: Utc::now(),
        total_members,
        active_members,
        average_performance,
        top_performers: top,
        recommendations: recommendations(group, average_performance, perfs),
    }
}

/// Fixed-threshold qualitative recommendations, in deterministic rule order.
fn recommendations(group: &Group, average: f64, perfs: &[UserPerformance]) -> Vec<String> {
    let mut out = Vec::new();

    if group.metrics.participation_rate < LOW_PARTICIPATION {
        out.push(
            "Participation is low: increase interactive activities such as live polls"
                .to_string(),
        );
    }
    if average < IMPROVEMENT_THRESHOLD {
        out.push(
            "Average assessment score is below target: schedule remedial sessions".to_string(),
        );
    }
    if !perfs.is_empty() {
        let attendance: f64 =
            perfs.iter().map(|p| p.metrics.attendance_rate).sum::<f64>() / perfs.len() as f64;
        if attendance < LOW_ATTENDANCE {
            out.push(
                "Attendance is below target: review session scheduling with the group"
                    .to_string(),
            );
        }
    }
    if group.metrics.trend == Trend::Decreasing {
        out.push("Performance trend is decreasing: review recent material difficulty".to_string());
    }
    if out.is_empty() {
        out.push("Group is on track: maintain the current training cadence".to_string());
    }
    out
}
