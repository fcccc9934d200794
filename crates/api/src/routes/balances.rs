//! Balance routes.

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tallyup_core::balance::{MemberSummary, summarize_members};
use tallyup_core::currency::round_amount;
use tallyup_core::expense::{Expense, Member};
use tallyup_shared::AppError;
use tallyup_shared::types::{Currency, MemberId};

use super::{check_amounts, currency_error, error_response, settlement_error};
use crate::AppState;

/// Creates the balance routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/balances", post(compute_balances))
}

/// Request body for balance computation.
#[derive(Debug, Deserialize)]
pub struct BalancesRequest {
    /// Group members in display order.
    pub members: Vec<Member>,
    /// Expenses to fold in.
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Currency for the member summaries; defaults to the reference currency.
    #[serde(default)]
    pub currency: Option<String>,
}

/// One member's balance, rounded to cents.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// The member.
    pub member_id: MemberId,
    /// Net balance in the reference currency.
    pub balance: Decimal,
}

/// Response for balance computation.
#[derive(Debug, Serialize)]
pub struct BalancesResponse {
    /// Reference currency of `balances`.
    pub currency: Currency,
    /// Net balance per member.
    pub balances: Vec<BalanceResponse>,
    /// Paid, owed and net per member in the requested currency.
    pub summaries: Vec<MemberSummary>,
}

/// POST `/balances` - Net balance per member.
async fn compute_balances(
    State(state): State<AppState>,
    Json(request): Json<BalancesRequest>,
) -> Response {
    match run(&state, &request) {
        Ok(response) => Json(response).into_response(),
        Err(err) => error_response(&err),
    }
}

fn run(state: &AppState, request: &BalancesRequest) -> Result<BalancesResponse, AppError> {
    check_amounts(&request.expenses)?;

    let rates = state.service.rates();
    let target = match request.currency.as_deref() {
        Some(code) => Currency::from_str(code).map_err(|e| AppError::Validation(e.to_string()))?,
        None => rates.reference(),
    };

    let balances = state
        .service
        .balances(&request.expenses, &request.members)
        .map_err(settlement_error)?;
    let summaries = summarize_members(rates, &request.expenses, &request.members, target)
        .map_err(currency_error)?;

    let decimal_places = state.service.policy().decimal_places();
    Ok(BalancesResponse {
        currency: rates.reference(),
        balances: balances
            .iter()
            .map(|entry| BalanceResponse {
                member_id: entry.member_id.clone(),
                balance: round_amount(entry.balance, decimal_places),
            })
            .collect(),
        summaries,
    })
}
