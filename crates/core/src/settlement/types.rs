//! Settlement domain types.

use rust_decimal::Decimal;
use serde::Serialize;
use tallyup_shared::config::SettlementConfig;
use tallyup_shared::types::{Currency, MemberId};

use super::error::SettlementError;
use crate::balance::Balances;

/// One directed payment instruction: `from` pays `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    /// Debtor making the payment.
    pub from: MemberId,
    /// Creditor receiving it.
    pub to: MemberId,
    /// Positive amount, rounded for display.
    pub amount: Decimal,
    /// Always the reference currency.
    pub currency: Currency,
}

/// Tolerance and output precision used by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettlementPolicy {
    tolerance: Decimal,
    decimal_places: u32,
}

impl SettlementPolicy {
    /// Creates a policy.
    ///
    /// # Errors
    ///
    /// Returns an error if `tolerance` is not positive.
    pub fn new(tolerance: Decimal, decimal_places: u32) -> Result<Self, SettlementError> {
        if tolerance <= Decimal::ZERO {
            return Err(SettlementError::InvalidTolerance(tolerance));
        }
        Ok(Self {
            tolerance,
            decimal_places,
        })
    }

    /// Builds the policy from the settlement configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured tolerance is not positive.
    pub fn from_config(config: &SettlementConfig) -> Result<Self, SettlementError> {
        Self::new(config.tolerance, config.decimal_places)
    }

    /// Magnitude below which a balance or transfer counts as zero.
    #[must_use]
    pub const fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Decimal places emitted amounts are rounded to.
    #[must_use]
    pub const fn decimal_places(&self) -> u32 {
        self.decimal_places
    }
}

impl Default for SettlementPolicy {
    /// One cent tolerance, amounts rounded to cents.
    fn default() -> Self {
        Self {
            tolerance: Decimal::new(1, 2),
            decimal_places: 2,
        }
    }
}

/// Balances and the transfers that settle them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementReport {
    /// Reference currency of every amount in the report.
    pub currency: Currency,
    /// Net balance per member at full precision.
    pub balances: Balances,
    /// Transfers in emission order.
    pub settlements: Vec<Settlement>,
    /// Sum of all transfer amounts.
    pub total_transferred: Decimal,
    /// Whether this report was served from the cache.
    pub cached: bool,
}

impl SettlementReport {
    /// Returns true if nobody needs to pay anybody.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settlements.is_empty()
    }
}
