//! HTTP routes for card transactions.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    cancel_transaction, complete_transaction, get_transaction, list_all, list_for_shop,
    list_mine, record_transaction, refund_transaction,
};
use crate::adapters::http::state::AppState;

/// Mounted at `/api/transactions`.
pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all).post(record_transaction))
        .route("/mine", get(list_mine))
        .route("/shop/:shop_id", get(list_for_shop))
        .route("/:id", get(get_transaction))
        .route("/:id/complete", post(complete_transaction))
        .route("/:id/cancel", post(cancel_transaction))
        .route("/:id/refund", post(refund_transaction))
}
