//! Expense statistics routes.

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;
use std::str::FromStr;
use tallyup_core::expense::Expense;
use tallyup_core::reports::ExpenseStats;
use tallyup_shared::AppError;
use tallyup_shared::types::Currency;

use super::{check_amounts, currency_error, error_response};
use crate::AppState;

/// Creates the statistics routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/stats", post(expense_stats))
}

/// Request body for statistics.
#[derive(Debug, Deserialize)]
pub struct StatsRequest {
    /// Expenses to summarize.
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Target currency; defaults to the reference currency.
    #[serde(default)]
    pub currency: Option<String>,
}

/// POST `/stats` - Totals, averages and category breakdown.
async fn expense_stats(State(state): State<AppState>, Json(request): Json<StatsRequest>) -> Response {
    match run(&state, &request) {
        Ok(stats) => Json(stats).into_response(),
        Err(err) => error_response(&err),
    }
}

fn run(state: &AppState, request: &StatsRequest) -> Result<ExpenseStats, AppError> {
    check_amounts(&request.expenses)?;

    let rates = state.service.rates();
    let target = match request.currency.as_deref() {
        Some(code) => Currency::from_str(code).map_err(|e| AppError::Validation(e.to_string()))?,
        None => rates.reference(),
    };

    ExpenseStats::compute(rates, &request.expenses, target).map_err(currency_error)
}
