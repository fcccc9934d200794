//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major units (e.g. dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: Currency,
}

/// ISO 4217 currency codes an expense can be recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    #[serde(alias = "usd")]
    Usd,
    /// Euro
    #[serde(alias = "eur")]
    Eur,
    /// British Pound
    #[serde(alias = "gbp")]
    Gbp,
    /// Japanese Yen
    #[serde(alias = "jpy")]
    Jpy,
    /// Australian Dollar
    #[serde(alias = "aud")]
    Aud,
    /// Canadian Dollar
    #[serde(alias = "cad")]
    Cad,
}

/// Error returned when parsing an unsupported currency code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown currency: {0}")]
pub struct UnknownCurrency(pub String);

impl Currency {
    /// Every supported currency, in display order.
    pub const ALL: [Self; 6] = [
        Self::Usd,
        Self::Eur,
        Self::Gbp,
        Self::Jpy,
        Self::Aud,
        Self::Cad,
    ];

    /// Returns the ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
            Self::Aud => "AUD",
            Self::Cad => "CAD",
        }
    }

    /// Returns the display symbol. Several dollar currencies share `$`.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Usd | Self::Aud | Self::Cad => "$",
            Self::Eur => "€",
            Self::Gbp => "£",
            Self::Jpy => "¥",
        }
    }

    /// Returns the built-in rate relative to USD (1 USD = rate units of `self`).
    #[must_use]
    pub fn standard_rate(self) -> Decimal {
        match self {
            Self::Usd => Decimal::ONE,
            Self::Eur => Decimal::new(91, 2),
            Self::Gbp => Decimal::new(79, 2),
            Self::Jpy => Decimal::new(15027, 2),
            Self::Aud => Decimal::new(152, 2),
            Self::Cad => Decimal::new(135, 2),
        }
    }
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns a copy rounded with banker's rounding.
    #[must_use]
    pub fn round(self, decimal_places: u32) -> Self {
        Self {
            amount: self
                .amount
                .round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven),
            currency: self.currency,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            "JPY" => Ok(Self::Jpy),
            "AUD" => Ok(Self::Aud),
            "CAD" => Ok(Self::Cad),
            _ => Err(UnknownCurrency(s.to_string())),
        }
    }
}

/// Formats as `-€1,234.50`: sign, symbol, grouped whole part, two decimals.
impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rounded = self.round(2);
        let sign = if rounded.is_negative() { "-" } else { "" };
        let digits = format!("{:.2}", rounded.amount.abs());
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        write!(
            f,
            "{sign}{}{}.{fraction}",
            self.currency.symbol(),
            group_thousands(whole)
        )
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
