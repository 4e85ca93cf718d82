use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::database::{activity_memberships_repo, trophies_repo};
use crate::models::{ActivityMembershipRow, TrophyMembershipRow};
use crate::services::bucket_service::MemberMode;
use crate::services::{round1, AccountingError};

/// Cap on award-equivalent hours unless a caller overrides it.
pub const DEFAULT_PRIZE_FULL: f64 = 10.0;

/// Capped award-equivalent time. `total` never exceeds the cap the
/// totals were computed against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AwardTotals {
    #[serde(rename = "on-campus")]
    pub on_campus: f64,
    #[serde(rename = "off-campus")]
    pub off_campus: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwardCatalogueEntry {
    pub name: String,
    pub duration: f64,
}

/// A trophy membership with its catalogue parsed, in provider order.
#[derive(Debug, Clone)]
struct TrophyView {
    trophy_id: String,
    award: String,
    mode: MemberMode,
    catalogue: Vec<AwardCatalogueEntry>,
}

/// Credited time from recognitions: prize-classified activities first,
/// then trophies in provider order, never exceeding `full`.
pub async fn account_awards(
    pool: &SqlitePool,
    user_id: &str,
    full: f64,
) -> Result<AwardTotals, AccountingError> {
    if full <= 0.0 {
        return Err(AccountingError::InvalidConfiguration(format!(
            "award cap must be positive, got {full}"
        )));
    }

    let prize_rows = activity_memberships_repo::list_prize_memberships(pool, user_id).await?;
    let totals = sum_prize_buckets(&prize_rows);
    if totals.total >= full {
        // Prize time alone fills the cap; trophies are not consulted.
        return Ok(rescale_to_cap(totals, full));
    }

    let trophy_rows = trophies_repo::list_effective_trophies(pool, user_id).await?;
    let trophies = parse_trophy_views(trophy_rows);
    Ok(credit_trophies(totals, &trophies, full))
}

fn sum_prize_buckets(rows: &[ActivityMembershipRow]) -> AwardTotals {
    let mut totals = AwardTotals::default();
    for row in rows {
        match MemberMode::parse(&row.mode) {
            MemberMode::OnCampus => {
                totals.on_campus += row.duration;
                totals.total += row.duration;
            }
            MemberMode::OffCampus => {
                totals.off_campus += row.duration;
                totals.total += row.duration;
            }
            // Counts toward neither bucket nor the total.
            MemberMode::Other => {}
        }
    }
    totals
}

/// Scales both buckets down to the cap, keeping their ratio. Only called
/// when `totals.total >= full > 0`, so the division is safe.
fn rescale_to_cap(totals: AwardTotals, full: f64) -> AwardTotals {
    let on_campus = round1(totals.on_campus / totals.total * full);
    AwardTotals {
        on_campus,
        off_campus: full - on_campus,
        total: full,
    }
}

fn parse_trophy_views(rows: Vec<TrophyMembershipRow>) -> Vec<TrophyView> {
    rows.into_iter()
        .map(|row| {
            let catalogue = match row.awards.as_deref() {
                None | Some("") => Vec::new(),
                Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
                    warn!("malformed award catalogue on trophy {}: {}", row.trophy_id, e);
                    Vec::new()
                }),
            };
            TrophyView {
                mode: MemberMode::parse(&row.mode),
                trophy_id: row.trophy_id,
                award: row.award,
                catalogue,
            }
        })
        .collect()
}

/// Outcome of considering a single trophy against the running total.
#[derive(Debug, PartialEq)]
enum TrophyCredit {
    Credited {
        mode: MemberMode,
        duration: f64,
        capped: bool,
    },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    AwardNotInCatalogue,
    UnrecognizedMode,
}

fn credit_one(total: f64, trophy: &TrophyView, full: f64) -> TrophyCredit {
    let Some(entry) = trophy.catalogue.iter().find(|e| e.name == trophy.award) else {
        return TrophyCredit::Skipped(SkipReason::AwardNotInCatalogue);
    };
    if trophy.mode == MemberMode::Other {
        // The granted award matched, but a mode outside the two buckets
        // credits nothing and does not advance the running total.
        return TrophyCredit::Skipped(SkipReason::UnrecognizedMode);
    }
    if total + entry.duration > full {
        TrophyCredit::Credited {
            mode: trophy.mode,
            duration: full - total,
            capped: true,
        }
    } else {
        TrophyCredit::Credited {
            mode: trophy.mode,
            duration: entry.duration,
            capped: false,
        }
    }
}

fn credit_trophies(mut totals: AwardTotals, trophies: &[TrophyView], full: f64) -> AwardTotals {
    for trophy in trophies {
        match credit_one(totals.total, trophy, full) {
            TrophyCredit::Credited {
                mode,
                duration,
                capped,
            } => {
                match mode {
                    MemberMode::OnCampus => totals.on_campus += duration,
                    MemberMode::OffCampus => totals.off_campus += duration,
                    // credit_one never routes Other here.
                    MemberMode::Other => {}
                }
                totals.total += duration;
                if capped {
                    return totals;
                }
            }
            TrophyCredit::Skipped(reason) => {
                debug!(
                    "trophy {} contributes no time ({:?})",
                    trophy.trophy_id, reason
                );
            }
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prize(mode: &str, duration: f64) -> ActivityMembershipRow {
        ActivityMembershipRow {
            activity_id: "a1".to_string(),
            mode: mode.to_string(),
            duration,
        }
    }

    fn trophy(id: &str, award: &str, mode: MemberMode, catalogue: &[(&str, f64)]) -> TrophyView {
        TrophyView {
            trophy_id: id.to_string(),
            award: award.to_string(),
            mode,
            catalogue: catalogue
                .iter()
                .map(|(name, duration)| AwardCatalogueEntry {
                    name: name.to_string(),
                    duration: *duration,
                })
                .collect(),
        }
    }

    #[test]
    fn no_prizes_and_no_trophies_is_all_zero() {
        let totals = sum_prize_buckets(&[]);
        let totals = credit_trophies(totals, &[], 10.0);
        assert_eq!(totals, AwardTotals::default());
    }

    #[test]
    fn prize_sum_ignores_unrecognized_modes_entirely() {
        let totals = sum_prize_buckets(&[
            prize("on-campus", 2.0),
            prize("off-campus", 1.0),
            prize("social-practice", 4.0),
        ]);
        assert_eq!(totals.on_campus, 2.0);
        assert_eq!(totals.off_campus, 1.0);
        assert_eq!(totals.total, 3.0);
    }

    #[test]
    fn rescale_keeps_bucket_ratio() {
        let totals = AwardTotals {
            on_campus: 9.0,
            off_campus: 3.0,
            total: 12.0,
        };
        let capped = rescale_to_cap(totals, 10.0);
        assert_eq!(capped.on_campus, 7.5);
        assert_eq!(capped.off_campus, 2.5);
        assert_eq!(capped.total, 10.0);
    }

    #[test]
    fn trophy_within_cap_is_credited_fully_and_loop_continues() {
        let trophies = vec![
            trophy("t1", "A", MemberMode::OnCampus, &[("A", 8.0)]),
            trophy("t2", "B", MemberMode::OffCampus, &[("B", 1.0)]),
        ];
        let totals = credit_trophies(AwardTotals::default(), &trophies, 10.0);
        assert_eq!(totals.on_campus, 8.0);
        assert_eq!(totals.off_campus, 1.0);
        assert_eq!(totals.total, 9.0);
    }

    #[test]
    fn trophy_over_cap_is_clipped_and_stops_processing() {
        let prior = AwardTotals {
            on_campus: 5.0,
            off_campus: 0.0,
            total: 5.0,
        };
        let trophies = vec![
            trophy("t1", "A", MemberMode::OnCampus, &[("A", 8.0)]),
            trophy("t2", "B", MemberMode::OffCampus, &[("B", 2.0)]),
        ];
        let totals = credit_trophies(prior, &trophies, 10.0);
        assert_eq!(totals.on_campus, 10.0);
        assert_eq!(totals.off_campus, 0.0);
        assert_eq!(totals.total, 10.0);
    }

    #[test]
    fn granted_award_missing_from_catalogue_is_skipped() {
        let trophies = vec![
            trophy("t1", "gold", MemberMode::OnCampus, &[("silver", 5.0)]),
            trophy("t2", "silver", MemberMode::OnCampus, &[("silver", 2.0)]),
        ];
        let totals = credit_trophies(AwardTotals::default(), &trophies, 10.0);
        assert_eq!(totals.on_campus, 2.0);
        assert_eq!(totals.total, 2.0);
    }

    #[test]
    fn unrecognized_mode_credits_nothing_but_later_trophies_still_run() {
        let trophies = vec![
            trophy("t1", "A", MemberMode::Other, &[("A", 9.0)]),
            trophy("t2", "B", MemberMode::OffCampus, &[("B", 3.0)]),
        ];
        let totals = credit_trophies(AwardTotals::default(), &trophies, 10.0);
        assert_eq!(totals.on_campus, 0.0);
        assert_eq!(totals.off_campus, 3.0);
        assert_eq!(totals.total, 3.0);
    }

    #[test]
    fn total_never_exceeds_the_cap() {
        let trophies: Vec<TrophyView> = (0..6)
            .map(|i| {
                trophy(
                    &format!("t{i}"),
                    "A",
                    MemberMode::OnCampus,
                    &[("A", 3.0)],
                )
            })
            .collect();
        let totals = credit_trophies(AwardTotals::default(), &trophies, 10.0);
        assert!(totals.total <= 10.0);
        assert_eq!(totals.total, 10.0);
        // 3 + 3 + 3 credited fully, the fourth clipped to 1.0.
        assert_eq!(totals.on_campus, 10.0);
    }

    #[test]
    fn malformed_catalogue_json_parses_to_empty() {
        let rows = vec![TrophyMembershipRow {
            trophy_id: "t1".to_string(),
            award: "A".to_string(),
            awards: Some("not json".to_string()),
            mode: "on-campus".to_string(),
        }];
        let views = parse_trophy_views(rows);
        assert!(views[0].catalogue.is_empty());
        let totals = credit_trophies(AwardTotals::default(), &views, 10.0);
        assert_eq!(totals, AwardTotals::default());
    }
}
