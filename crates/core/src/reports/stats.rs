//! Statistics computation.

use rust_decimal::Decimal;
use serde::Serialize;
use tallyup_shared::types::Currency;
use tracing::debug;

use super::types::{CategorySummary, ExpenseHighlight};
use crate::currency::{CurrencyError, RateTable, convert_currency, round_amount};
use crate::expense::Expense;

const PERCENTAGE_DECIMAL_PLACES: u32 = 1;

/// Aggregate view of a set of expenses in one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseStats {
    /// Currency of every amount below.
    pub currency: Currency,
    /// Sum of all converted amounts.
    pub total: Decimal,
    /// Number of expenses.
    pub count: usize,
    /// Mean converted amount, zero when there are no expenses.
    pub average: Decimal,
    /// Per-category totals in the order categories first appear.
    pub categories: Vec<CategorySummary>,
    /// The most expensive expense, first one wins ties.
    pub largest: Option<ExpenseHighlight>,
    /// The cheapest expense, first one wins ties.
    pub smallest: Option<ExpenseHighlight>,
}

impl ExpenseStats {
    /// Computes statistics with every amount converted to `target`.
    ///
    /// Each expense is converted and rounded to cents before summing, so
    /// the total matches what a user would add up by hand.
    ///
    /// # Errors
    ///
    /// Returns an error if an expense's currency or `target` has no rate, or
    /// if a total overflows.
    pub fn compute(
        rates: &RateTable,
        expenses: &[Expense],
        target: Currency,
    ) -> Result<Self, CurrencyError> {
        let converted = expenses
            .iter()
            .map(|expense| {
                convert_currency(rates, expense.amount, expense.currency, target)
                    .map(|amount| (expense, amount))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let overflow = |expense: &Expense| CurrencyError::Overflow {
            amount: expense.amount,
            currency: expense.currency,
        };

        let mut total = Decimal::ZERO;
        for (expense, amount) in &converted {
            total = total.checked_add(*amount).ok_or_else(|| overflow(*expense))?;
        }
        let count = converted.len();
        let average = if count == 0 {
            Decimal::ZERO
        } else {
            round_amount(total / Decimal::from(count), 2)
        };

        let mut categories: Vec<CategorySummary> = Vec::new();
        for (expense, amount) in &converted {
            match categories
                .iter_mut()
                .find(|summary| summary.category == expense.category)
            {
                Some(summary) => {
                    summary.amount = summary
                        .amount
                        .checked_add(*amount)
                        .ok_or_else(|| overflow(*expense))?;
                }
                None => categories.push(CategorySummary {
                    category: expense.category.clone(),
                    amount: *amount,
                    percentage: Decimal::ZERO,
                }),
            }
        }
        if !total.is_zero() {
            for summary in &mut categories {
                let share = summary
                    .amount
                    .checked_div(total)
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                    .ok_or(CurrencyError::Overflow {
                        amount: summary.amount,
                        currency: target,
                    })?;
                summary.percentage = round_amount(share, PERCENTAGE_DECIMAL_PLACES);
            }
        }

        let mut largest: Option<&(&Expense, Decimal)> = None;
        let mut smallest: Option<&(&Expense, Decimal)> = None;
        for entry in &converted {
            if largest.is_none_or(|(_, max)| entry.1 > *max) {
                largest = Some(entry);
            }
            if smallest.is_none_or(|(_, min)| entry.1 < *min) {
                smallest = Some(entry);
            }
        }

        debug!(
            count,
            categories = categories.len(),
            currency = %target,
            "Computed expense statistics"
        );

        Ok(Self {
            currency: target,
            total,
            count,
            average,
            categories,
            largest: largest.map(highlight),
            smallest: smallest.map(highlight),
        })
    }

    /// Looks up a category's summary by name.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&CategorySummary> {
        self.categories.iter().find(|summary| summary.category == name)
    }
}

fn highlight((expense, amount): &(&Expense, Decimal)) -> ExpenseHighlight {
    ExpenseHighlight {
        expense_id: expense.id.clone(),
        description: expense.description.clone(),
        amount: *amount,
    }
}
