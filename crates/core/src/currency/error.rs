//! Currency error types.

use rust_decimal::Decimal;
use tallyup_shared::types::{Currency, UnknownCurrency};
use thiserror::Error;

/// Errors raised while building a rate table or converting amounts.
///
/// All of these are configuration errors: they mean the rate table cannot
/// serve the request, never that the user typed something wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// The rate table has no entry for the currency.
    #[error("No exchange rate configured for {0}")]
    MissingRate(Currency),

    /// A configured rate is zero or negative.
    #[error("Exchange rate for {currency} must be positive, got {rate}")]
    NonPositiveRate {
        /// Currency with the invalid rate.
        currency: Currency,
        /// The rejected rate.
        rate: Decimal,
    },

    /// The reference currency must have a rate of exactly 1.
    #[error("Reference currency {currency} must have rate 1, got {rate}")]
    ReferenceRateNotOne {
        /// The reference currency.
        currency: Currency,
        /// Its configured rate.
        rate: Decimal,
    },

    /// The amount is too large to convert with the given rate.
    #[error("Amount {amount} {currency} overflows during conversion")]
    Overflow {
        /// Amount being converted.
        amount: Decimal,
        /// Currency of the amount.
        currency: Currency,
    },

    /// The currency code is not supported at all.
    #[error(transparent)]
    Unknown(#[from] UnknownCurrency),
}
