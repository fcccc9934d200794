//! Core settlement logic for Tallyup.
//!
//! This crate contains pure business logic with ZERO web dependencies.
//! Given a snapshot of group members and the expenses they recorded, it
//! answers who owes whom, in one reference currency.
//!
//! # Modules
//!
//! - `currency` - Rate tables, normalization and conversion
//! - `expense` - Members, expenses, validation and grouping
//! - `balance` - Net balance per member
//! - `settlement` - Greedy debtor/creditor matching and report caching
//! - `reports` - Expense statistics

pub mod balance;
pub mod currency;
pub mod expense;
pub mod reports;
pub mod settlement;

pub use balance::compute_balances;
pub use currency::normalize_amount;
pub use settlement::compute_settlements;
