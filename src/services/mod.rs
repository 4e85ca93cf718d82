pub mod award_service;
pub mod bucket_service;
pub mod error;
pub mod time_service;

pub use error::AccountingError;

/// Rounds to one decimal place, the resolution all credited hours are
/// reported in.
pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
