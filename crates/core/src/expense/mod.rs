//! Group members and the expenses they record.
//!
//! The caller owns these collections; everything in the core only reads them.

pub mod grouping;
pub mod types;
pub mod validation;

pub use grouping::{GroupBy, group_expenses};
pub use types::{Expense, ExpenseDraft, Member};
pub use validation::{ExpenseIssue, check_references, validate_expense};
