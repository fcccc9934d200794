//! Immutable exchange rate table.
//!
//! Rates are expressed against a single reference currency:
//! `1 reference unit = rate units of the currency`. The reference currency's
//! own rate is therefore always 1.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tallyup_shared::config::CurrencyConfig;
use tallyup_shared::types::Currency;
use tracing::error;

use super::error::CurrencyError;

/// Static lookup table of exchange rates relative to a reference currency.
///
/// The table is a plain value: build it once (usually from configuration)
/// and hand it to whatever needs to normalize amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateTable {
    reference: Currency,
    rates: BTreeMap<Currency, Decimal>,
}

impl RateTable {
    /// Builds a validated rate table.
    ///
    /// Currencies without an entry are allowed; converting them fails with
    /// [`CurrencyError::MissingRate`].
    ///
    /// # Errors
    ///
    /// Returns an error if any rate is not positive, or if the reference
    /// currency is missing or not exactly 1.
    pub fn new(
        reference: Currency,
        rates: impl IntoIterator<Item = (Currency, Decimal)>,
    ) -> Result<Self, CurrencyError> {
        let rates: BTreeMap<Currency, Decimal> = rates.into_iter().collect();

        if let Some((currency, rate)) = rates.iter().find(|(_, rate)| **rate <= Decimal::ZERO) {
            return Err(CurrencyError::NonPositiveRate {
                currency: *currency,
                rate: *rate,
            });
        }

        match rates.get(&reference) {
            None => return Err(CurrencyError::MissingRate(reference)),
            Some(rate) if *rate != Decimal::ONE => {
                return Err(CurrencyError::ReferenceRateNotOne {
                    currency: reference,
                    rate: *rate,
                });
            }
            Some(_) => {}
        }

        Ok(Self { reference, rates })
    }

    /// The built-in USD-referenced table.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            reference: Currency::Usd,
            rates: Currency::ALL
                .iter()
                .map(|currency| (*currency, currency.standard_rate()))
                .collect(),
        }
    }

    /// Builds the table described by the currency configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured rates are invalid.
    pub fn from_config(config: &CurrencyConfig) -> Result<Self, CurrencyError> {
        Self::new(config.reference, config.resolved_rates())
    }

    /// Returns the reference currency.
    #[must_use]
    pub const fn reference(&self) -> Currency {
        self.reference
    }

    /// Looks up the rate for a currency.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::MissingRate`] if the table has no entry.
    pub fn rate(&self, currency: Currency) -> Result<Decimal, CurrencyError> {
        self.rates.get(&currency).copied().ok_or_else(|| {
            error!(
                currency = %currency,
                reference = %self.reference,
                "No exchange rate configured"
            );
            CurrencyError::MissingRate(currency)
        })
    }

    /// Converts an amount into the reference currency without rounding.
    ///
    /// # Errors
    ///
    /// Returns an error if the currency has no rate or the division overflows.
    pub fn normalize(&self, amount: Decimal, from: Currency) -> Result<Decimal, CurrencyError> {
        let rate = self.rate(from)?;
        amount.checked_div(rate).ok_or(CurrencyError::Overflow {
            amount,
            currency: from,
        })
    }

    /// Converts an amount between two currencies through the reference
    /// currency, without rounding.
    ///
    /// # Errors
    ///
    /// Returns an error if either currency has no rate or the arithmetic overflows.
    pub fn convert_exact(
        &self,
        amount: Decimal,
        from: Currency,
        to: Currency,
    ) -> Result<Decimal, CurrencyError> {
        let normalized = self.normalize(amount, from)?;
        let rate = self.rate(to)?;
        normalized.checked_mul(rate).ok_or(CurrencyError::Overflow {
            amount,
            currency: from,
        })
    }

    /// Iterates over `(currency, rate)` pairs in currency order.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, Decimal)> + '_ {
        self.rates.iter().map(|(currency, rate)| (*currency, *rate))
    }

    /// Returns true if the table has a rate for the currency.
    #[must_use]
    pub fn contains(&self, currency: Currency) -> bool {
        self.rates.contains_key(&currency)
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::standard()
    }
}
