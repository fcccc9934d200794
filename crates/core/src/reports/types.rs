//! Statistics data types.

use rust_decimal::Decimal;
use serde::Serialize;
use tallyup_shared::types::ExpenseId;

/// Spending in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    /// Category name as entered on the expenses.
    pub category: String,
    /// Total spent in the target currency.
    pub amount: Decimal,
    /// Share of the overall total, in percent with one decimal place.
    pub percentage: Decimal,
}

/// A single notable expense (largest or smallest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseHighlight {
    /// Expense ID.
    pub expense_id: ExpenseId,
    /// Expense description.
    pub description: String,
    /// Amount in the target currency.
    pub amount: Decimal,
}
