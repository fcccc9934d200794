//! Settling balances with a short list of peer-to-peer transfers.
//!
//! The matcher is a greedy heuristic: the largest debtor pays the largest
//! creditor until one of them is settled, then the next in line steps in.
//! It keeps the transfer count low but does not promise the global minimum.

pub mod cache;
pub mod error;
pub mod matcher;
pub mod service;
pub mod types;

#[cfg(test)]
mod props;

pub use cache::SettlementCache;
pub use error::SettlementError;
pub use matcher::SettlementMatcher;
pub use service::{SettlementService, compute_settlements};
pub use types::{Settlement, SettlementPolicy, SettlementReport};
