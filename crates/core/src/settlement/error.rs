//! Settlement error types.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::currency::CurrencyError;

/// Errors that can occur while computing a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// An expense could not be normalized.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// The settlement tolerance must be positive.
    #[error("Settlement tolerance must be positive, got {0}")]
    InvalidTolerance(Decimal),
}
