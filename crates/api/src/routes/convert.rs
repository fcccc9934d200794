//! Currency conversion route.

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tallyup_core::currency::convert_currency;
use tallyup_shared::AppError;
use tallyup_shared::types::{Currency, Money};

use super::{currency_error, error_response};
use crate::AppState;

/// Creates the conversion routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/convert", post(convert))
}

/// Request body for a conversion.
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    /// Amount in `from`.
    pub amount: Decimal,
    /// Source currency code.
    pub from: String,
    /// Target currency code.
    pub to: String,
}

/// Conversion result.
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    /// Original amount.
    pub amount: Decimal,
    /// Source currency.
    pub from: Currency,
    /// Target currency.
    pub to: Currency,
    /// Converted amount, rounded to cents.
    pub converted: Decimal,
    /// Converted amount formatted for display.
    pub formatted: String,
}

/// POST `/convert` - Convert an amount between two currencies.
async fn convert(State(state): State<AppState>, Json(request): Json<ConvertRequest>) -> Response {
    match run(&state, &request) {
        Ok(response) => Json(response).into_response(),
        Err(err) => error_response(&err),
    }
}

fn run(state: &AppState, request: &ConvertRequest) -> Result<ConvertResponse, AppError> {
    let from = Currency::from_str(&request.from).map_err(|e| AppError::Validation(e.to_string()))?;
    let to = Currency::from_str(&request.to).map_err(|e| AppError::Validation(e.to_string()))?;
    let converted =
        convert_currency(state.service.rates(), request.amount, from, to).map_err(currency_error)?;

    Ok(ConvertResponse {
        amount: request.amount,
        from,
        to,
        converted,
        formatted: Money::new(converted, to).to_string(),
    })
}
