//! Net balance per member.
//!
//! Positive balances are owed money (creditors), negative balances owe
//! money (debtors). All amounts are in the rate table's reference currency.

pub mod accumulator;
pub mod summary;

#[cfg(test)]
mod props;

pub use accumulator::{
    BalanceAccumulator, BalanceOverflow, Balances, MemberBalance, compute_balances,
};
pub use summary::{MemberSummary, summarize_members};
