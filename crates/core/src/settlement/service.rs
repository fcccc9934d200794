//! Settlement service combining balance accumulation and matching.
//!
//! This is the entry point callers use: hand it the current member and
//! expense snapshots, get back balances and the transfers that settle them.

use rust_decimal::Decimal;
use tracing::info;

use super::error::SettlementError;
use super::matcher::SettlementMatcher;
use super::types::{Settlement, SettlementPolicy, SettlementReport};
use crate::balance::{BalanceAccumulator, Balances};
use crate::currency::{CurrencyError, RateTable};
use crate::expense::{Expense, Member};

/// Settlement service over an injected rate table and policy.
///
/// Holds no state between calls; every call recomputes from its inputs.
#[derive(Debug, Clone)]
pub struct SettlementService {
    rates: RateTable,
    policy: SettlementPolicy,
}

impl SettlementService {
    /// Creates a service.
    #[must_use]
    pub fn new(rates: RateTable, policy: SettlementPolicy) -> Self {
        Self { rates, policy }
    }

    /// The rate table used for normalization.
    #[must_use]
    pub const fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// The matcher policy.
    #[must_use]
    pub const fn policy(&self) -> SettlementPolicy {
        self.policy
    }

    /// Computes balances in the reference currency.
    ///
    /// # Errors
    ///
    /// Returns an error if an expense's currency has no rate.
    pub fn balances(
        &self,
        expenses: &[Expense],
        members: &[Member],
    ) -> Result<Balances, SettlementError> {
        Ok(BalanceAccumulator::new(&self.rates).accumulate(expenses, members)?)
    }

    /// Computes the transfers that settle the group.
    ///
    /// # Errors
    ///
    /// Returns an error if an expense's currency has no rate.
    pub fn settle(
        &self,
        expenses: &[Expense],
        members: &[Member],
    ) -> Result<Vec<Settlement>, SettlementError> {
        let balances = self.balances(expenses, members)?;
        Ok(self.matcher().settle(&balances))
    }

    /// Computes balances and transfers together.
    ///
    /// # Errors
    ///
    /// Returns an error if an expense's currency has no rate or an amount
    /// overflows.
    pub fn report(
        &self,
        expenses: &[Expense],
        members: &[Member],
    ) -> Result<SettlementReport, SettlementError> {
        let balances = self.balances(expenses, members)?;
        let settlements = self.matcher().settle(&balances);
        let mut total_transferred = Decimal::ZERO;
        for settlement in &settlements {
            total_transferred = total_transferred.checked_add(settlement.amount).ok_or(
                CurrencyError::Overflow {
                    amount: settlement.amount,
                    currency: settlement.currency,
                },
            )?;
        }

        info!(
            members = members.len(),
            expenses = expenses.len(),
            transfers = settlements.len(),
            total = %total_transferred,
            "Settlement report computed"
        );

        Ok(SettlementReport {
            currency: self.rates.reference(),
            balances,
            settlements,
            total_transferred,
            cached: false,
        })
    }

    fn matcher(&self) -> SettlementMatcher {
        SettlementMatcher::new(self.rates.reference(), self.policy)
    }
}

impl Default for SettlementService {
    fn default() -> Self {
        Self::new(RateTable::standard(), SettlementPolicy::default())
    }
}

/// Computes settlements with the default policy (one cent tolerance).
///
/// # Errors
///
/// Returns an error if an expense's currency has no rate.
pub fn compute_settlements(
    rates: &RateTable,
    expenses: &[Expense],
    members: &[Member],
) -> Result<Vec<Settlement>, CurrencyError> {
    let balances = BalanceAccumulator::new(rates).accumulate(expenses, members)?;
    Ok(SettlementMatcher::new(rates.reference(), SettlementPolicy::default()).settle(&balances))
}
