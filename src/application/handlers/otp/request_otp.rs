//! RequestOtpHandler - Starts an OTP session and sends the code.

use std::sync::Arc;

use crate::domain::foundation::{
    DomainError, ErrorCode, OtpSessionId, PhoneNumber, Timestamp, UserId,
};
use crate::domain::otp::{OtpCode, OtpError, OtpHasher, OtpPolicy, OtpPurpose, OtpSession};
use crate::ports::{OtpSender, OtpSessionRepository, UserRepository};

/// Command to request a one-time code for a phone number.
#[derive(Debug, Clone)]
pub struct RequestOtpCommand {
    pub phone: PhoneNumber,
    pub purpose: OtpPurpose,
    /// Authenticated caller; required for `PhoneChange`.
    pub requested_by: Option<UserId>,
}

/// Result of a successful request or resend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpDispatchResult {
    pub session_id: OtpSessionId,
    pub expires_at: Timestamp,
    pub resend_available_at: Timestamp,
    pub resends_remaining: u32,
}

impl OtpDispatchResult {
    pub(super) fn from_session(session: &OtpSession) -> Self {
        Self {
            session_id: *session.id(),
            expires_at: *session.expires_at(),
            resend_available_at: session.next_resend_at(),
            resends_remaining: session.max_resends().saturating_sub(session.resend_count()),
        }
    }
}

pub struct RequestOtpHandler {
    sessions: Arc<dyn OtpSessionRepository>,
    users: Arc<dyn UserRepository>,
    sender: Arc<dyn OtpSender>,
    hasher: OtpHasher,
    policy: OtpPolicy,
}

impl RequestOtpHandler {
    pub fn new(
        sessions: Arc<dyn OtpSessionRepository>,
        users: Arc<dyn UserRepository>,
        sender: Arc<dyn OtpSender>,
        hasher: OtpHasher,
        policy: OtpPolicy,
    ) -> Self {
        Self {
            sessions,
            users,
            sender,
            hasher,
            policy,
        }
    }

    pub async fn handle(&self, cmd: RequestOtpCommand) -> Result<OtpDispatchResult, DomainError> {
        let now = Timestamp::now();

        // 1. Purpose-specific preconditions
        if cmd.purpose == OtpPurpose::PhoneChange {
            let caller = cmd.requested_by.ok_or_else(|| {
                DomainError::new(ErrorCode::Unauthorized, "Phone change requires a signed-in user")
            })?;
            if let Some(owner) = self.users.find_by_phone(&cmd.phone).await? {
                if owner.id() != &caller {
                    return Err(DomainError::new(
                        ErrorCode::PhoneAlreadyRegistered,
                        "Phone number is already registered",
                    ));
                }
            }
        }

        // 2. Generate and hash the code; only the hash is stored
        let session_id = OtpSessionId::new();
        let code = OtpCode::generate(self.policy.code_length);
        let hash = self.hasher.hash(&session_id, code.as_str());
        let requested_by = match cmd.purpose {
            OtpPurpose::Login => None,
            OtpPurpose::PhoneChange => cmd.requested_by,
        };
        let session = OtpSession::start(
            session_id,
            cmd.phone.clone(),
            cmd.purpose,
            requested_by,
            hash,
            &self.policy,
            now,
        );

        // 3. Persist under the per-phone hourly cap, then deliver
        let stored = self
            .sessions
            .save_within_limit(&session, &now.minus_secs(3600), self.policy.max_sessions_per_hour)
            .await?;
        if !stored {
            tracing::warn!(
                phone = %cmd.phone.redacted(),
                limit = self.policy.max_sessions_per_hour,
                "OTP request rate limited"
            );
            return Err(OtpError::TooManyRequests.into());
        }
        self.sender.send(&cmd.phone, &code, cmd.purpose).await?;

        tracing::info!(
            session_id = %session.id(),
            purpose = cmd.purpose.as_str(),
            "OTP session started"
        );
        Ok(OtpDispatchResult::from_session(&session))
    }
}
