//! Settlement routes.

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;
use tallyup_core::expense::{Expense, Member};
use tracing::info;

use super::{check_amounts, error_response, settlement_error};
use crate::AppState;

/// Creates the settlement routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/settlements", post(compute_settlements))
}

/// Request body for settlement computation.
#[derive(Debug, Deserialize)]
pub struct SettlementsRequest {
    /// Group members in display order.
    pub members: Vec<Member>,
    /// Expenses to settle.
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

/// POST `/settlements` - Balances plus the transfers that settle them.
async fn compute_settlements(
    State(state): State<AppState>,
    Json(request): Json<SettlementsRequest>,
) -> Response {
    if let Err(err) = check_amounts(&request.expenses) {
        return error_response(&err);
    }

    match state
        .cache
        .report_cached(&state.service, &request.expenses, &request.members)
    {
        Ok(report) => {
            info!(
                cached = report.cached,
                transfers = report.settlements.len(),
                "Settlements served"
            );
            Json(report).into_response()
        }
        Err(err) => error_response(&settlement_error(err)),
    }
}
