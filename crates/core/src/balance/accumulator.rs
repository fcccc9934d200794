//! Folding expenses into per-member balances.
//!
//! Each expense credits its payer with the full normalized amount and
//! debits every member of its split group with an equal share. When the
//! payer is part of the split group they end up paying only the difference.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use tallyup_shared::types::MemberId;
use thiserror::Error;
use tracing::warn;

use crate::currency::{CurrencyError, RateTable};
use crate::expense::{Expense, Member};

/// Balance of one member in the reference currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberBalance {
    /// The member.
    pub member_id: MemberId,
    /// Net balance: positive is owed, negative owes.
    pub balance: Decimal,
}

/// Ordered map of member balances.
///
/// Iteration follows member order, which the settlement matcher relies on
/// to break ties deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balances {
    entries: Vec<MemberBalance>,
    index: HashMap<MemberId, usize>,
}

/// A balance left the representable `Decimal` range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Balance of {member_id} overflowed")]
pub struct BalanceOverflow {
    /// Member whose balance could not be updated.
    pub member_id: MemberId,
}

impl Balances {
    /// Creates zero balances for the given members. Repeated ids are kept once.
    #[must_use]
    pub fn zeroed(member_ids: impl IntoIterator<Item = MemberId>) -> Self {
        let mut balances = Self::default();
        for member_id in member_ids {
            if !balances.index.contains_key(&member_id) {
                balances.push(member_id, Decimal::ZERO);
            }
        }
        balances
    }

    /// Creates balances from `(member, balance)` pairs.
    ///
    /// Repeated ids are merged into the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns an error if merging repeated ids overflows.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (MemberId, Decimal)>,
    ) -> Result<Self, BalanceOverflow> {
        let mut balances = Self::default();
        for (member_id, balance) in entries {
            if !balances.adjust(&member_id, balance)? {
                balances.push(member_id, balance);
            }
        }
        Ok(balances)
    }

    fn push(&mut self, member_id: MemberId, balance: Decimal) {
        self.index.insert(member_id.clone(), self.entries.len());
        self.entries.push(MemberBalance { member_id, balance });
    }

    /// Adds `delta` to a tracked member. Returns `Ok(false)` if the member is
    /// unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the new balance is out of range; the balance is
    /// left unchanged.
    pub fn adjust(&mut self, member_id: &MemberId, delta: Decimal) -> Result<bool, BalanceOverflow> {
        let Some(&position) = self.index.get(member_id) else {
            return Ok(false);
        };
        let entry = &mut self.entries[position];
        entry.balance = entry
            .balance
            .checked_add(delta)
            .ok_or_else(|| BalanceOverflow {
                member_id: member_id.clone(),
            })?;
        Ok(true)
    }

    /// Returns the balance of a member, if tracked.
    #[must_use]
    pub fn get(&self, member_id: &str) -> Option<Decimal> {
        self.index
            .get(member_id)
            .map(|&position| self.entries[position].balance)
    }

    /// Iterates in member order.
    pub fn iter(&self) -> std::slice::Iter<'_, MemberBalance> {
        self.entries.iter()
    }

    /// Number of tracked members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no member is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all balances, or `None` if the sum is out of range. Close to
    /// zero for any set of expenses.
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        self.entries
            .iter()
            .try_fold(Decimal::ZERO, |sum, entry| sum.checked_add(entry.balance))
    }
}

impl<'a> IntoIterator for &'a Balances {
    type Item = &'a MemberBalance;
    type IntoIter = std::slice::Iter<'a, MemberBalance>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for Balances {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entries)
    }
}

/// Returns the members an expense is split between.
///
/// An empty `split_with` falls back to every known member.
pub(crate) fn split_group<'a>(expense: &'a Expense, members: &'a [Member]) -> Vec<&'a MemberId> {
    if expense.split_with.is_empty() {
        members.iter().map(|member| &member.id).collect()
    } else {
        expense.split_with.iter().collect()
    }
}

/// Computes balances from expenses using an injected rate table.
#[derive(Debug, Clone, Copy)]
pub struct BalanceAccumulator<'r> {
    rates: &'r RateTable,
}

impl<'r> BalanceAccumulator<'r> {
    /// Creates an accumulator over the given rates.
    #[must_use]
    pub const fn new(rates: &'r RateTable) -> Self {
        Self { rates }
    }

    /// Folds all expenses into balances for `members`.
    ///
    /// Every member appears in the result, with zero if they took part in
    /// nothing. Ids that are not members are not tracked.
    ///
    /// # Errors
    ///
    /// Returns an error if an expense's currency has no rate.
    pub fn accumulate(
        &self,
        expenses: &[Expense],
        members: &[Member],
    ) -> Result<Balances, CurrencyError> {
        let mut balances = Balances::zeroed(members.iter().map(|member| member.id.clone()));

        for expense in expenses {
            let normalized = self.rates.normalize(expense.amount, expense.currency)?;
            let overflow = |_: BalanceOverflow| CurrencyError::Overflow {
                amount: expense.amount,
                currency: expense.currency,
            };

            if !balances.adjust(&expense.paid_by, normalized).map_err(overflow)? {
                warn!(
                    expense_id = %expense.id,
                    member_id = %expense.paid_by,
                    "Payer is not a known member, credit not tracked"
                );
            }

            let group = split_group(expense, members);
            if group.is_empty() {
                continue;
            }
            let share = normalized / Decimal::from(group.len());

            for member_id in group {
                if !balances.adjust(member_id, -share).map_err(overflow)? {
                    warn!(
                        expense_id = %expense.id,
                        member_id = %member_id,
                        "Split member is not a known member, share not tracked"
                    );
                }
            }
        }

        Ok(balances)
    }
}

/// Computes each member's net balance in the reference currency.
///
/// # Errors
///
/// Returns an error if an expense's currency has no rate.
pub fn compute_balances(
    rates: &RateTable,
    expenses: &[Expense],
    members: &[Member],
) -> Result<Balances, CurrencyError> {
    BalanceAccumulator::new(rates).accumulate(expenses, members)
}
