//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes over the settlement core
//! - Shared application state
//! - JSON error responses

pub mod routes;

use axum::Router;
use std::sync::Arc;
use tallyup_core::settlement::{SettlementCache, SettlementService};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Settlement service holding the configured rates and policy.
    pub service: Arc<SettlementService>,
    /// Memoized settlement reports.
    pub cache: SettlementCache,
}

impl AppState {
    /// Creates the state from a service and cache.
    #[must_use]
    pub fn new(service: SettlementService, cache: SettlementCache) -> Self {
        Self {
            service: Arc::new(service),
            cache,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SettlementService::default(), SettlementCache::default())
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
