use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

/// Create the API application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Health and info
        .route("/health", get(handlers::health))
        .route("/v1/info", get(handlers::info))
        .route("/v1/status", get(handlers::get_status))

        // Deposit escrow
        .route("/v1/deposits", post(handlers::deposit))
        .route("/v1/refunds", post(handlers::refund))

        // Reports and settlement
        .route("/v1/garbage/reports", post(handlers::report_garbage))
        .route("/v1/donations/claim", post(handlers::claim_donation))
        .route("/v1/purchases", post(handlers::report_purchase))
        .route("/v1/rewards/claim", post(handlers::claim_reward))

        // Units and penalties
        .route("/v1/units/buy", post(handlers::buy_units))
        .route("/v1/units/return", post(handlers::return_units))
        .route("/v1/consumers/:address", get(handlers::get_consumer))
        .route("/v1/penalties/withdraw", post(handlers::withdraw_penalty))
        .route(
            "/v1/penalties/seized/withdraw",
            post(handlers::withdraw_seized_penalties),
        )

        // Actor registry
        .route("/v1/actors/:role", post(handlers::add_actor))
        .route("/v1/actors/:role/:address", delete(handlers::remove_actor))

        // Journal and reports
        .route("/v1/events", get(handlers::list_events))
        .route("/v1/epochs/:index/report", get(handlers::get_epoch_report))

        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
