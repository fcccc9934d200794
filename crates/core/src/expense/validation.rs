//! Expense input validation.
//!
//! These checks belong to the caller's form layer; the settlement
//! computation itself assumes they already passed.

use rust_decimal::Decimal;
use serde::Serialize;
use tallyup_shared::types::MemberId;
use thiserror::Error;

use super::types::{Expense, ExpenseDraft, Member};

/// A single problem found in an expense.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "issue", content = "member_id", rename_all = "snake_case")]
pub enum ExpenseIssue {
    /// Description is missing or blank.
    #[error("Description is required")]
    MissingDescription,

    /// Amount is missing, zero, or negative.
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,

    /// No payer selected.
    #[error("Paid by member must be selected")]
    MissingPayer,

    /// Date is missing.
    #[error("Date is required")]
    MissingDate,

    /// Category is missing or blank.
    #[error("Category is required")]
    MissingCategory,

    /// Payer is not a known member.
    #[error("Payer {0} is not a member of the group")]
    UnknownPayer(MemberId),

    /// A split participant is not a known member.
    #[error("Split member {0} is not a member of the group")]
    UnknownSplitMember(MemberId),
}

fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|text| text.trim().is_empty())
}

/// Validates a draft, returning every issue found (empty when valid).
#[must_use]
pub fn validate_expense(draft: &ExpenseDraft) -> Vec<ExpenseIssue> {
    let mut issues = Vec::new();

    if is_blank(draft.description.as_ref()) {
        issues.push(ExpenseIssue::MissingDescription);
    }
    if draft.amount.is_none_or(|amount| amount <= Decimal::ZERO) {
        issues.push(ExpenseIssue::NonPositiveAmount);
    }
    if draft.paid_by.as_ref().is_none_or(|id| id.as_str().is_empty()) {
        issues.push(ExpenseIssue::MissingPayer);
    }
    if draft.date.is_none() {
        issues.push(ExpenseIssue::MissingDate);
    }
    if is_blank(draft.category.as_ref()) {
        issues.push(ExpenseIssue::MissingCategory);
    }

    issues
}

/// Reports payer and split ids that do not belong to a known member.
#[must_use]
pub fn check_references(expense: &Expense, members: &[Member]) -> Vec<ExpenseIssue> {
    let is_known = |id: &MemberId| members.iter().any(|member| member.id == *id);
    let mut issues = Vec::new();

    if !is_known(&expense.paid_by) {
        issues.push(ExpenseIssue::UnknownPayer(expense.paid_by.clone()));
    }
    issues.extend(
        expense
            .split_with
            .iter()
            .filter(|id| !is_known(id))
            .map(|id| ExpenseIssue::UnknownSplitMember(id.clone())),
    );

    issues
}
