//! Performance tracker: per-user, per-group metric merges with an
//! append-only history, plus the read-only derivations used by reporting.

use chrono::{DateTime, Utc};

use crate::engine::types::{
    MetricsUpdate, PerformanceRecord, RecordKind, UserPerformance,
};

/// Assessment score below which a user counts as an improvement area.
pub const IMPROVEMENT_THRESHOLD: f64 = 70.0;

/// Create a zeroed record for a (user, group) pair seen for the first time.
pub fn blank(user_id: &str, group_id: &str, now: DateTime<Utc>) -> UserPerformance {
    UserPerformance {
        user_id: user_id.to_string(),
        group_id: group_id.to_string(),
        metrics: Default::default(),
        history: Vec::new(),
        last_updated: now,
    }
}

/// Merge a partial update into an existing record: only provided fields
/// overwrite, `last_updated` always refreshes, and one history record is
/// appended for the highest-priority updated metric (assessment >
/// participation > attendance > engagement). An update touching only
/// `improvement_rate` refreshes metrics without a history entry.
pub fn apply_update(perf: &mut UserPerformance, update: &MetricsUpdate, now: DateTime<Utc>) {
    if let Some(v) = update.attendance_rate {
        perf.metrics.attendance_rate = v;
    }
    if let Some(v) = update.participation_score {
        perf.metrics.participation_score = v;
    }
    if let Some(v) = update.assessment_score {
        perf.metrics.assessment_score = v;
    }
    if let Some(v) = update.engagement_level {
        perf.metrics.engagement_level = v;
    }
    if let Some(v) = update.improvement_rate {
        perf.metrics.improvement_rate = v;
    }
    perf.last_updated = now;

    let recorded = update
        .assessment_score
        .map(|score| (RecordKind::Assessment, score))
        .or_else(|| {
            update
                .participation_score
                .map(|score| (RecordKind::Participation, score))
        })
        .or_else(|| {
            update
                .attendance_rate
                .map(|score| (RecordKind::Attendance, score))
        })
        .or_else(|| {
            update
                .engagement_level
                .map(|score| (RecordKind::Engagement, score))
        });

    if let Some((kind, score)) = recorded {
        perf.history.push(PerformanceRecord {
            date: now,
            score,
            kind,
            detail: update.detail.clone(),
        });
    }
}

/// Top performers: descending assessment score, ties broken by user id so
/// the ordering is deterministic.
pub fn top_performers(perfs: &[UserPerformance], limit: usize) -> Vec<UserPerformance> {
    let mut sorted: Vec<UserPerformance> = perfs.to_vec();
    sorted.sort_by(|a, b| {
        b.metrics
            .assessment_score
            .partial_cmp(&a.metrics.assessment_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    sorted.truncate(limit);
    sorted
}

/// Users scoring below the improvement threshold, ordered worst first.
pub fn improvement_areas(perfs: &[UserPerformance]) -> Vec<UserPerformance> {
    let mut below: Vec<UserPerformance> = perfs
        .iter()
        .filter(|p| p.metrics.assessment_score < IMPROVEMENT_THRESHOLD)
        .cloned()
        .collect();
    below.sort_by(|a, b| {
        a.metrics
            .assessment_score
            .partial_cmp(&b.metrics.assessment_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    below
}
