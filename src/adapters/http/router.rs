//! Top-level API router.
//!
//! Every endpoint group is nested under `/api`. The auth middleware runs on
//! all of them; routes that need a caller use the `RequireAuth` or
//! `RequireAdmin` extractors.

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;

use super::analytics::analytics_routes;
use super::auth::auth_routes;
use super::cms::cms_routes;
use super::discounts::{quote_routes, rule_routes};
use super::middleware::auth_middleware;
use super::shops::shop_routes;
use super::state::AppState;
use super::transactions::transaction_routes;
use super::users::user_routes;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /api/health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Builds the `/api` router with state applied.
///
/// Transport layers (tracing, CORS, timeouts) are added by the binary so
/// tests can drive the bare router.
pub fn api_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/shops", shop_routes())
        .nest("/discount-rules", rule_routes())
        .nest("/discounts", quote_routes())
        .nest("/transactions", transaction_routes())
        .nest("/cms", cms_routes())
        .nest("/analytics", analytics_routes())
        .layer(middleware::from_fn_with_state(
            state.session_validator.clone(),
            auth_middleware,
        ));

    Router::new().nest("/api", api).with_state(state)
}
