//! HTTP DTOs for OTP login endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::dto::rfc3339;
use crate::adapters::http::users::dto::UserResponse;
use crate::application::handlers::otp::{OtpDispatchResult, VerifyOtpResult};
use crate::domain::otp::OtpPurpose;

/// POST /auth/otp/request
#[derive(Debug, Clone, Deserialize)]
pub struct RequestOtpRequest {
    pub phone: String,
    /// Defaults to `login`.
    #[serde(default)]
    pub purpose: Option<OtpPurpose>,
}

/// POST /auth/otp/verify
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpRequest {
    pub session_id: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OtpDispatchResponse {
    pub session_id: String,
    pub expires_at: String,
    pub resend_available_at: String,
    pub resends_remaining: u32,
}

impl From<OtpDispatchResult> for OtpDispatchResponse {
    fn from(result: OtpDispatchResult) -> Self {
        Self {
            session_id: result.session_id.to_string(),
            expires_at: rfc3339(&result.expires_at),
            resend_available_at: rfc3339(&result.resend_available_at),
            resends_remaining: result.resends_remaining,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: String,
    pub purpose: OtpPurpose,
    pub is_new_user: bool,
    pub user: UserResponse,
}

impl From<VerifyOtpResult> for TokenResponse {
    fn from(result: VerifyOtpResult) -> Self {
        Self {
            access_token: result.token.access_token,
            token_type: result.token.token_type.to_string(),
            expires_at: rfc3339(&result.token.expires_at),
            purpose: result.purpose,
            is_new_user: result.is_new_user,
            user: UserResponse::from(&result.user),
        }
    }
}
