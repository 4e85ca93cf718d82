use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::activity_memberships_repo;
use crate::models::ActivityMembershipRow;
use crate::services::AccountingError;

/// Membership mode as recorded on a row. Anything that is not
/// on-campus or off-campus falls under `Other`; bucketing treats that
/// as social practice, award crediting skips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberMode {
    OnCampus,
    OffCampus,
    Other,
}

impl MemberMode {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "on-campus" => MemberMode::OnCampus,
            "off-campus" => MemberMode::OffCampus,
            _ => MemberMode::Other,
        }
    }
}

/// Unrounded per-mode sums for one activity query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ActivityBuckets {
    #[serde(rename = "on-campus")]
    pub on_campus: f64,
    #[serde(rename = "off-campus")]
    pub off_campus: f64,
    #[serde(rename = "social-practice")]
    pub social_practice: f64,
}

impl ActivityBuckets {
    pub fn sum(&self) -> f64 {
        self.on_campus + self.off_campus + self.social_practice
    }
}

/// Sums memberships into buckets by mode. Shared by the special and
/// normal paths; the two only differ in which activities the repo query
/// selects.
pub(crate) fn bucket_by_mode(rows: &[ActivityMembershipRow]) -> ActivityBuckets {
    let mut buckets = ActivityBuckets::default();
    for row in rows {
        match MemberMode::parse(&row.mode) {
            MemberMode::OnCampus => buckets.on_campus += row.duration,
            MemberMode::OffCampus => buckets.off_campus += row.duration,
            MemberMode::Other => buckets.social_practice += row.duration,
        }
    }
    buckets
}

/// Time from special, non-prize activities.
pub async fn account_special(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<ActivityBuckets, AccountingError> {
    let rows = activity_memberships_repo::list_special_memberships(pool, user_id).await?;
    Ok(bucket_by_mode(&rows))
}

/// Time from normal activities.
pub async fn account_normal(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<ActivityBuckets, AccountingError> {
    let rows = activity_memberships_repo::list_normal_memberships(pool, user_id).await?;
    Ok(bucket_by_mode(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(mode: &str, duration: f64) -> ActivityMembershipRow {
        ActivityMembershipRow {
            activity_id: "a1".to_string(),
            mode: mode.to_string(),
            duration,
        }
    }

    #[test]
    fn buckets_by_recorded_mode() {
        let rows = vec![
            row("on-campus", 3.0),
            row("off-campus", 2.0),
            row("on-campus", 1.5),
        ];
        let buckets = bucket_by_mode(&rows);
        assert_eq!(buckets.on_campus, 4.5);
        assert_eq!(buckets.off_campus, 2.0);
        assert_eq!(buckets.social_practice, 0.0);
    }

    #[test]
    fn unknown_modes_count_as_social_practice() {
        let rows = vec![row("social-practice", 2.5), row("", 1.0)];
        let buckets = bucket_by_mode(&rows);
        assert_eq!(buckets.on_campus, 0.0);
        assert_eq!(buckets.off_campus, 0.0);
        assert_eq!(buckets.social_practice, 3.5);
    }

    #[test]
    fn bucket_sum_matches_total_of_all_durations() {
        let rows = vec![
            row("on-campus", 1.25),
            row("off-campus", 0.75),
            row("community", 2.0),
            row("on-campus", 4.0),
        ];
        let buckets = bucket_by_mode(&rows);
        assert!((buckets.sum() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_is_all_zero() {
        assert_eq!(bucket_by_mode(&[]), ActivityBuckets::default());
    }
}
