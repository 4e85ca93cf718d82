use sqlx::SqlitePool;

use crate::models::TrophyMembershipRow;

const SQL_LIST_EFFECTIVE_TROPHIES: &str = r#"
SELECT
  t.trophy_id,
  t.award,
  t.awards,
  m.mode
FROM trophies t
JOIN trophy_members m ON m.trophy_id = t.trophy_id
WHERE m.user_id = ?1
  AND m.status = 'effective'
ORDER BY t.created_at ASC, t.trophy_id ASC
"#;

/// Trophies where the person holds an effective membership.
///
/// Row order is part of the contract: award crediting processes trophies
/// in the order returned here, and the cap tie-break depends on it.
/// Chronological order (`created_at`, then `trophy_id`) keeps it stable.
pub async fn list_effective_trophies(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Vec<TrophyMembershipRow>> {
    sqlx::query_as::<_, TrophyMembershipRow>(SQL_LIST_EFFECTIVE_TROPHIES)
        .bind(user_id)
        .fetch_all(pool)
        .await
}
