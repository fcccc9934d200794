//! Expense validation routes.

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tallyup_core::expense::{ExpenseDraft, ExpenseIssue, Member, check_references};
use tallyup_shared::AppError;
use tallyup_shared::types::ExpenseId;

use super::error_response;
use crate::AppState;

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/expenses/validate", post(validate_expense))
}

/// Request body for draft validation.
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    /// The draft as entered.
    pub expense: ExpenseDraft,
    /// Known members; when given, payer and split ids are checked against them.
    #[serde(default)]
    pub members: Option<Vec<Member>>,
}

/// Validation outcome.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    /// True when no issues were found.
    pub valid: bool,
    /// Issues with a human-readable message each.
    pub issues: Vec<Value>,
}

/// POST `/expenses/validate` - Check a draft before it is recorded.
async fn validate_expense(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Response {
    match run(&state, request) {
        Ok(response) => Json(response).into_response(),
        Err(err) => error_response(&err),
    }
}

fn run(state: &AppState, request: ValidateRequest) -> Result<ValidateResponse, AppError> {
    let reference = state.service.rates().reference();
    let issues = match request.expense.finalize(ExpenseId::generate(), reference) {
        Ok(expense) => request
            .members
            .map(|members| check_references(&expense, &members))
            .unwrap_or_default(),
        Err(issues) => issues,
    };

    Ok(ValidateResponse {
        valid: issues.is_empty(),
        issues: issues.iter().map(describe).collect::<Result<_, _>>()?,
    })
}

fn describe(issue: &ExpenseIssue) -> Result<Value, AppError> {
    let mut value = serde_json::to_value(issue).map_err(|e| AppError::Internal(e.to_string()))?;
    value["message"] = json!(issue.to_string());
    Ok(value)
}
