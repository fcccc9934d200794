//! Grouping expenses for listing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::Expense;

/// Key an expense list can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// ISO date (`YYYY-MM-DD`).
    Date,
    /// Category label.
    Category,
    /// Paying member id.
    PaidBy,
}

impl GroupBy {
    fn key(self, expense: &Expense) -> String {
        match self {
            Self::Date => expense.date.format("%Y-%m-%d").to_string(),
            Self::Category => expense.category.clone(),
            Self::PaidBy => expense.paid_by.to_string(),
        }
    }
}

/// Groups expenses by the given key. Input order is kept within each group.
#[must_use]
pub fn group_expenses(expenses: &[Expense], group_by: GroupBy) -> BTreeMap<String, Vec<&Expense>> {
    let mut groups: BTreeMap<String, Vec<&Expense>> = BTreeMap::new();
    for expense in expenses {
        groups.entry(group_by.key(expense)).or_default().push(expense);
    }
    groups
}
