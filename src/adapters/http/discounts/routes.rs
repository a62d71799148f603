//! HTTP routes for discount rules and quotes.

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{
    activate_rule, create_platform_rule, deactivate_rule, delete_rule, list_platform_rules, quote,
    update_rule,
};
use crate::adapters::http::state::AppState;

/// Mounted at `/api/discount-rules`.
pub fn rule_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_platform_rules).post(create_platform_rule))
        .route("/:id", patch(update_rule).delete(delete_rule))
        .route("/:id/activate", post(activate_rule))
        .route("/:id/deactivate", post(deactivate_rule))
}

/// Mounted at `/api/discounts`.
pub fn quote_routes() -> Router<AppState> {
    Router::new().route("/quote", post(quote))
}
