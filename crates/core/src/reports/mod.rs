//! Expense statistics.
//!
//! Totals, averages and category breakdowns over an expense snapshot,
//! expressed in a single target currency.

pub mod stats;
pub mod types;


pub use stats::ExpenseStats;
pub use types::{CategorySummary, ExpenseHighlight};
