//! HTTP handlers for OTP login.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::{OptionalAuth, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::adapters::http::users::dto::UserResponse;
use crate::application::handlers::otp::{RequestOtpCommand, ResendOtpCommand, VerifyOtpCommand};
use crate::application::handlers::user::GetUserQuery;
use crate::domain::foundation::{OtpSessionId, PhoneNumber};
use crate::domain::otp::OtpPurpose;

use super::dto::{OtpDispatchResponse, RequestOtpRequest, TokenResponse, VerifyOtpRequest};

/// POST /api/auth/otp/request - Send a one-time code
///
/// Anonymous for `login`. A `phone_change` request must carry the caller's
/// bearer token; the code goes to the new number.
pub async fn request_otp(
    State(state): State<AppState>,
    OptionalAuth(caller): OptionalAuth,
    Json(req): Json<RequestOtpRequest>,
) -> Result<(StatusCode, Json<OtpDispatchResponse>), ApiError> {
    let phone = PhoneNumber::parse(&req.phone)?;
    let result = state
        .request_otp_handler()
        .handle(RequestOtpCommand {
            phone,
            purpose: req.purpose.unwrap_or(OtpPurpose::Login),
            requested_by: caller.map(|c| c.id),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(result.into())))
}

/// POST /api/auth/otp/:id/resend
pub async fn resend_otp(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OtpDispatchResponse>, ApiError> {
    let session_id: OtpSessionId = parse_id("session_id", &id)?;
    let result = state
        .resend_otp_handler()
        .handle(ResendOtpCommand { session_id })
        .await?;
    Ok(Json(result.into()))
}

/// POST /api/auth/otp/verify - Exchange a code for an access token
pub async fn verify_otp(
    State(state): State<AppState>,
    OptionalAuth(caller): OptionalAuth,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let session_id: OtpSessionId = parse_id("session_id", &req.session_id)?;
    let result = state
        .verify_otp_handler()
        .handle(VerifyOtpCommand {
            session_id,
            code: req.code,
            caller,
        })
        .await?;
    Ok(Json(result.into()))
}

/// GET /api/auth/me - The authenticated user's profile
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = actor.id;
    let user = state
        .get_user_handler()
        .get(GetUserQuery { actor, user_id })
        .await?;
    Ok(Json(user.into()))
}
