//! ResendOtpHandler - Sends a fresh code for an existing session.

use std::sync::Arc;

use super::OtpDispatchResult;
use crate::domain::foundation::{DomainError, ErrorCode, OtpSessionId, Timestamp};
use crate::domain::otp::{OtpCode, OtpHasher, OtpPolicy};
use crate::ports::{OtpSender, OtpSessionRepository};

#[derive(Debug, Clone)]
pub struct ResendOtpCommand {
    pub session_id: OtpSessionId,
}

/// Handler for resending codes.
///
/// The new code replaces the old one and the expiry restarts. Failed
/// attempts carry over so a resend cannot be used to reset the lockout.
pub struct ResendOtpHandler {
    sessions: Arc<dyn OtpSessionRepository>,
    sender: Arc<dyn OtpSender>,
    hasher: OtpHasher,
    policy: OtpPolicy,
}

impl ResendOtpHandler {
    pub fn new(
        sessions: Arc<dyn OtpSessionRepository>,
        sender: Arc<dyn OtpSender>,
        hasher: OtpHasher,
        policy: OtpPolicy,
    ) -> Self {
        Self {
            sessions,
            sender,
            hasher,
            policy,
        }
    }

    pub async fn handle(&self, cmd: ResendOtpCommand) -> Result<OtpDispatchResult, DomainError> {
        let now = Timestamp::now();

        // 1. Load session
        let mut session = self
            .sessions
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(ErrorCode::OtpSessionNotFound, "OTP session", cmd.session_id)
            })?;

        // 2. Check limits before generating anything
        session.ensure_can_resend(&now)?;

        // 3. Swap in the new code
        let code = OtpCode::generate(self.policy.code_length);
        let hash = self.hasher.hash(session.id(), code.as_str());
        session.resend(hash, self.policy.ttl_secs, now)?;

        // 4. Persist, then deliver
        self.sessions.update(&session).await?;
        self.sender
            .send(session.phone(), &code, session.purpose())
            .await?;

        tracing::info!(
            session_id = %session.id(),
            resend_count = session.resend_count(),
            "OTP code resent"
        );
        Ok(OtpDispatchResult::from_session(&session))
    }
}
