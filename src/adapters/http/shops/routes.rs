//! HTTP routes for shop endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    approve_shop, close_shop, create_shop, create_shop_rule, get_shop, list_shop_rules,
    reinstate_shop, search_shops, suspend_shop, update_shop,
};
use crate::adapters::http::state::AppState;

/// Mounted at `/api/shops`.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_shops).post(create_shop))
        .route("/:id", get(get_shop).patch(update_shop))
        .route("/:id/approve", post(approve_shop))
        .route("/:id/suspend", post(suspend_shop))
        .route("/:id/reinstate", post(reinstate_shop))
        .route("/:id/close", post(close_shop))
        .route("/:id/rules", get(list_shop_rules).post(create_shop_rule))
}
