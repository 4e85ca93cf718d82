use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountingError {
    /// A cap or discount parameter that would make the computation
    /// nonsensical (`full <= 0`, negative rate, negative base). Rejected
    /// before any query runs.
    #[error("invalid accounting configuration: {0}")]
    InvalidConfiguration(String),

    /// A provider failure, propagated unchanged. The engine does not
    /// retry; a retry would re-run the same pure computation.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
