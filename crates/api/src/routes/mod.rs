//! API route definitions.
//!
//! Every endpoint is stateless: requests carry the member and expense
//! snapshot they want evaluated.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde_json::json;
use tallyup_core::currency::CurrencyError;
use tallyup_core::expense::Expense;
use tallyup_core::settlement::SettlementError;
use tallyup_shared::AppError;
use tracing::error;

use crate::AppState;

pub mod balances;
pub mod convert;
pub mod currencies;
pub mod expenses;
pub mod health;
pub mod settlements;
pub mod stats;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(currencies::routes())
        .merge(convert::routes())
        .merge(balances::routes())
        .merge(settlements::routes())
        .merge(stats::routes())
        .merge(expenses::routes())
}

/// Renders an application error as `{error, message}` JSON.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, "Request failed");
    }
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

/// Maps a conversion failure to the error the client should see.
pub(crate) fn currency_error(err: CurrencyError) -> AppError {
    match err {
        CurrencyError::Overflow { .. } | CurrencyError::Unknown(_) => {
            AppError::Validation(err.to_string())
        }
        CurrencyError::MissingRate(_)
        | CurrencyError::NonPositiveRate { .. }
        | CurrencyError::ReferenceRateNotOne { .. } => AppError::Configuration(err.to_string()),
    }
}

/// Maps a settlement failure to the error the client should see.
pub(crate) fn settlement_error(err: SettlementError) -> AppError {
    match err {
        SettlementError::Currency(inner) => currency_error(inner),
        SettlementError::InvalidTolerance(_) => AppError::Configuration(err.to_string()),
    }
}

/// Rejects snapshots containing non-positive amounts.
pub(crate) fn check_amounts(expenses: &[Expense]) -> Result<(), AppError> {
    match expenses.iter().find(|expense| expense.amount <= Decimal::ZERO) {
        Some(expense) => Err(AppError::Validation(format!(
            "Expense {} has a non-positive amount",
            expense.id
        ))),
        None => Ok(()),
    }
}
