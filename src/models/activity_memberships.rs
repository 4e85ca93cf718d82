/// One person's membership in one activity, as returned by the
/// activity queries. The queries guarantee at most one row per
/// (activity, person) pair.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityMembershipRow {
    pub activity_id: String,
    pub mode: String,
    pub duration: f64,
}
