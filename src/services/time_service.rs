use serde::Serialize;
use sqlx::SqlitePool;

use crate::services::award_service::{self, AwardTotals, DEFAULT_PRIZE_FULL};
use crate::services::bucket_service::{self, ActivityBuckets};
use crate::services::{round1, AccountingError};

/// Converts on-campus hours beyond `base` into off-campus credit at
/// `rate`, capped at `full_cap` extra hours. On-campus time itself is
/// not reduced by the conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountPolicy {
    pub enabled: bool,
    pub rate: f64,
    pub full_cap: f64,
    pub base: f64,
}

impl Default for DiscountPolicy {
    fn default() -> Self {
        DiscountPolicy {
            enabled: false,
            rate: 1.0 / 3.0,
            full_cap: 6.0,
            base: 30.0,
        }
    }
}

impl DiscountPolicy {
    pub fn enabled() -> Self {
        DiscountPolicy {
            enabled: true,
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<(), AccountingError> {
        if self.rate < 0.0 {
            return Err(AccountingError::InvalidConfiguration(format!(
                "discount rate must not be negative, got {}",
                self.rate
            )));
        }
        if self.base < 0.0 {
            return Err(AccountingError::InvalidConfiguration(format!(
                "discount base must not be negative, got {}",
                self.base
            )));
        }
        Ok(())
    }
}

/// The final per-category summary, every field rounded to one decimal
/// place. Produced fresh on each call and never persisted here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSummary {
    #[serde(rename = "on-campus")]
    pub on_campus: f64,
    #[serde(rename = "off-campus")]
    pub off_campus: f64,
    #[serde(rename = "social-practice")]
    pub social_practice: f64,
    pub trophy: f64,
    pub total: f64,
}

/// Full service-time summary for one person: award-equivalent time,
/// normal activities, special non-prize activities, then the rounding
/// and discount policy in that order.
pub async fn account_time(
    pool: &SqlitePool,
    user_id: &str,
    discount: DiscountPolicy,
) -> Result<TimeSummary, AccountingError> {
    discount.validate()?;

    let award = award_service::account_awards(pool, user_id, DEFAULT_PRIZE_FULL).await?;
    let normal = bucket_service::account_normal(pool, user_id).await?;
    let special = bucket_service::account_special(pool, user_id).await?;

    Ok(build_summary(award, normal, special, discount))
}

/// Combines the three partial results. Rounding order is part of the
/// contract: on/off-campus are rounded before the discount conversion,
/// the remaining fields after it.
fn build_summary(
    award: AwardTotals,
    normal: ActivityBuckets,
    special: ActivityBuckets,
    discount: DiscountPolicy,
) -> TimeSummary {
    let mut on_campus = award.on_campus + normal.on_campus + special.on_campus;
    let mut off_campus = award.off_campus + normal.off_campus + special.off_campus;
    let social_practice = normal.social_practice + special.social_practice;
    let total = award.total + normal.sum() + special.sum();

    on_campus = round1(on_campus);
    off_campus = round1(off_campus);
    if discount.enabled {
        off_campus += discount_extra(on_campus, &discount);
    }

    TimeSummary {
        on_campus,
        off_campus,
        social_practice: round1(social_practice),
        trophy: round1(award.total),
        total: round1(total),
    }
}

fn discount_extra(on_campus: f64, discount: &DiscountPolicy) -> f64 {
    if on_campus <= discount.base {
        return 0.0;
    }
    let extra = round1((on_campus - discount.base) * discount.rate);
    extra.min(discount.full_cap)
}
