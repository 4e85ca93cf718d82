use sqlx::SqlitePool;

use crate::models::ActivityMembershipRow;

const SQL_LIST_PRIZE_MEMBERSHIPS: &str = r#"
SELECT
  a.activity_id,
  m.mode,
  m.duration
FROM activities a
JOIN activity_members m ON m.activity_id = a.activity_id
WHERE m.user_id = ?1
  AND a.type = 'special'
  AND a.classify = 'prize'
ORDER BY a.activity_id
"#;

/// Memberships in special, prize-classified activities. These feed the
/// award cap check, so no status narrowing is applied here.
pub async fn list_prize_memberships(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<ActivityMembershipRow>> {
    sqlx::query_as::<_, ActivityMembershipRow>(SQL_LIST_PRIZE_MEMBERSHIPS)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

const SQL_LIST_SPECIAL_MEMBERSHIPS: &str = r#"
SELECT
  a.activity_id,
  m.mode,
  m.duration
FROM activities a
JOIN activity_members m ON m.activity_id = a.activity_id
WHERE m.user_id = ?1
  AND m.status = 'effective'
  AND a.status = 'effective'
  AND a.type = 'special'
  AND (a.classify IS NULL OR a.classify != 'prize')
ORDER BY a.activity_id
"#;

/// Effective memberships in special, non-prize activities.
pub async fn list_special_memberships(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<ActivityMembershipRow>> {
    sqlx::query_as::<_, ActivityMembershipRow>(SQL_LIST_SPECIAL_MEMBERSHIPS)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

const SQL_LIST_NORMAL_MEMBERSHIPS: &str = r#"
SELECT
  a.activity_id,
  m.mode,
  m.duration
FROM activities a
JOIN activity_members m ON m.activity_id = a.activity_id
WHERE m.user_id = ?1
  AND m.status = 'effective'
  AND a.status = 'effective'
  AND a.type != 'special'
ORDER BY a.activity_id
"#;

/// Effective memberships in normal (non-special) activities.
pub async fn list_normal_memberships(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<ActivityMembershipRow>> {
    sqlx::query_as::<_, ActivityMembershipRow>(SQL_LIST_NORMAL_MEMBERSHIPS)
        .bind(user_id)
        .fetch_all(pool)
        .await
}
