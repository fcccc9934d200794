//! Currency conversion entry points.
//!
//! CRITICAL: Rounding strategy for multi-currency:
//! - Normalization into the reference currency never rounds
//! - Rounding happens once, at the presentation boundary
//! - Use banker's rounding (round half to even)

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use tallyup_shared::types::Currency;

use super::error::CurrencyError;
use super::rates::RateTable;

/// Decimal places used for amounts shown to people.
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// Converts an amount into the table's reference currency at full precision.
///
/// # Errors
///
/// Returns [`CurrencyError::MissingRate`] if `currency` is not in the table.
pub fn normalize_amount(
    rates: &RateTable,
    amount: Decimal,
    currency: Currency,
) -> Result<Decimal, CurrencyError> {
    rates.normalize(amount, currency)
}

/// Converts an amount between any two currencies, rounded to 2 decimal places.
///
/// # Errors
///
/// Returns an error if either currency is missing from the table.
pub fn convert_currency(
    rates: &RateTable,
    amount: Decimal,
    from: Currency,
    to: Currency,
) -> Result<Decimal, CurrencyError> {
    rates
        .convert_exact(amount, from, to)
        .map(|converted| round_amount(converted, DISPLAY_DECIMAL_PLACES))
}

/// Rounds a value using banker's rounding (MidpointNearestEven).
#[must_use]
pub fn round_amount(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}
