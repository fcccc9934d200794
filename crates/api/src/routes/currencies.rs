//! Currency listing routes.

use axum::{Json, Router, extract::State, routing::get};
use rust_decimal::Decimal;
use serde::Serialize;
use tallyup_shared::types::Currency;

use crate::AppState;

/// Creates the currency routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/currencies", get(list_currencies))
}

/// Response for a currency.
#[derive(Debug, Serialize)]
pub struct CurrencyResponse {
    /// Currency code (ISO 4217).
    pub code: Currency,
    /// Display symbol.
    pub symbol: &'static str,
    /// Units of this currency per one unit of the reference currency.
    pub rate: Decimal,
}

/// Response for the currency listing.
#[derive(Debug, Serialize)]
pub struct CurrenciesResponse {
    /// Reference currency.
    pub reference: Currency,
    /// Every currency with a configured rate.
    pub currencies: Vec<CurrencyResponse>,
}

/// GET `/currencies` - List supported currencies and their rates.
async fn list_currencies(State(state): State<AppState>) -> Json<CurrenciesResponse> {
    let rates = state.service.rates();
    Json(CurrenciesResponse {
        reference: rates.reference(),
        currencies: rates
            .iter()
            .map(|(code, rate)| CurrencyResponse {
                code,
                symbol: code.symbol(),
                rate,
            })
            .collect(),
    })
}
