//! HTTP routes for analytics reports.

use axum::{routing::get, Router};

use super::handlers::{categories, daily, overview, shop_report, top_shops};
use crate::adapters::http::state::AppState;

/// Mounted at `/api/analytics`.
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/overview", get(overview))
        .route("/daily", get(daily))
        .route("/top-shops", get(top_shops))
        .route("/categories", get(categories))
        .route("/shops/:id", get(shop_report))
}
