//! HTTP routes for OTP login.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{me, request_otp, resend_otp, verify_otp};
use crate::adapters::http::state::AppState;

/// Mounted at `/api/auth`.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/otp/request", post(request_otp))
        .route("/otp/verify", post(verify_otp))
        .route("/otp/:id/resend", post(resend_otp))
        .route("/me", get(me))
}
