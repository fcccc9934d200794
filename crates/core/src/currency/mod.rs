//! Multi-currency handling: the rate table and normalization into the
//! reference currency.

pub mod conversion;
pub mod error;
pub mod rates;

#[cfg(test)]
mod props;

pub use conversion::{convert_currency, normalize_amount, round_amount};
pub use error::CurrencyError;
pub use rates::RateTable;
