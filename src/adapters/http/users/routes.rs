//! HTTP routes for user and card endpoints.

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{
    block_card, change_card_tier, change_role, get_user, issue_card, list_users, my_card,
    reactivate_user, renew_card, suspend_user, unblock_card, update_me,
};
use crate::adapters::http::state::AppState;

/// Mounted at `/api/users`. The `/me` routes are declared before `/:id`.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", patch(update_me))
        .route("/me/card", get(my_card))
        .route("/:id", get(get_user))
        .route("/:id/role", post(change_role))
        .route("/:id/suspend", post(suspend_user))
        .route("/:id/reactivate", post(reactivate_user))
        .route("/:id/card", post(issue_card))
        .route("/:id/card/block", post(block_card))
        .route("/:id/card/unblock", post(unblock_card))
        .route("/:id/card/tier", post(change_card_tier))
        .route("/:id/card/renew", post(renew_card))
}
