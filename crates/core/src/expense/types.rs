//! Member and expense records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tallyup_shared::types::{Currency, ExpenseId, MemberId};

use super::validation::{ExpenseIssue, validate_expense};

/// A person taking part in the shared budget.
///
/// Identity is the id; names are not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique member id.
    pub id: MemberId,
    /// Display name.
    pub name: String,
    /// Optional contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Member {
    /// Creates a member without an email.
    #[must_use]
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
        }
    }

    /// Sets the contact email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// A single recorded expense.
///
/// `amount` is positive and in `currency`. An empty `split_with` means the
/// expense is shared by every known member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique expense id.
    pub id: ExpenseId,
    /// What the money was spent on.
    pub description: String,
    /// Amount in `currency`.
    pub amount: Decimal,
    /// Member who paid.
    pub paid_by: MemberId,
    /// Date of the expense.
    pub date: NaiveDate,
    /// Free-form category label.
    pub category: String,
    /// Currency the amount was recorded in.
    pub currency: Currency,
    /// Members sharing the cost; empty means everyone.
    #[serde(default)]
    pub split_with: Vec<MemberId>,
}

impl Expense {
    /// Creates an expense dated today, split across everyone.
    #[must_use]
    pub fn new(paid_by: impl Into<MemberId>, amount: Decimal, currency: Currency) -> Self {
        Self {
            id: ExpenseId::generate(),
            description: String::new(),
            amount,
            paid_by: paid_by.into(),
            date: chrono::Utc::now().date_naive(),
            category: String::new(),
            currency,
            split_with: Vec::new(),
        }
    }

    /// Sets the expense id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<ExpenseId>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the date.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Restricts the split to the given members.
    #[must_use]
    pub fn split_with<I, M>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<MemberId>,
    {
        self.split_with = members.into_iter().map(Into::into).collect();
        self
    }
}

/// A partially filled expense as it arrives from a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseDraft {
    /// What the money was spent on.
    pub description: Option<String>,
    /// Amount in `currency`.
    pub amount: Option<Decimal>,
    /// Member who paid.
    pub paid_by: Option<MemberId>,
    /// Date of the expense.
    pub date: Option<NaiveDate>,
    /// Category label.
    pub category: Option<String>,
    /// Currency; falls back to the caller's default when absent.
    pub currency: Option<Currency>,
    /// Members sharing the cost.
    pub split_with: Vec<MemberId>,
}

impl ExpenseDraft {
    /// Turns a complete draft into an expense.
    ///
    /// # Errors
    ///
    /// Returns every validation issue if the draft is incomplete.
    pub fn finalize(
        self,
        id: ExpenseId,
        default_currency: Currency,
    ) -> Result<Expense, Vec<ExpenseIssue>> {
        let issues = validate_expense(&self);
        let (Some(description), Some(amount), Some(paid_by), Some(date), Some(category)) =
            (self.description, self.amount, self.paid_by, self.date, self.category)
        else {
            return Err(issues);
        };
        if !issues.is_empty() {
            return Err(issues);
        }

        Ok(Expense {
            id,
            description: description.trim().to_string(),
            amount,
            paid_by,
            date,
            category: category.trim().to_string(),
            currency: self.currency.unwrap_or(default_currency),
            split_with: self.split_with,
        })
    }
}
