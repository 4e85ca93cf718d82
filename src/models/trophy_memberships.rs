/// One person's membership in one trophy, joined with the trophy's
/// granted award name and its award catalogue.
///
/// `awards` is the catalogue as stored: a JSON array of
/// `{"name": ..., "duration": ...}` entries in catalogue order.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrophyMembershipRow {
    pub trophy_id: String,
    pub award: String,
    pub awards: Option<String>,
    pub mode: String,
}
