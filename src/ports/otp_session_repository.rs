//! OTP session repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OtpSessionId, Timestamp};
use crate::domain::otp::OtpSession;

#[async_trait]
pub trait OtpSessionRepository: Send + Sync {
    async fn save(&self, session: &OtpSession) -> Result<(), DomainError>;

    /// Stores a new session unless `limit` sessions already exist for its
    /// phone created at or after `since`. Counting and inserting happen
    /// atomically per phone.
    ///
    /// Returns `false`, storing nothing, when the limit is reached.
    async fn save_within_limit(
        &self,
        session: &OtpSession,
        since: &Timestamp,
        limit: u32,
    ) -> Result<bool, DomainError>;

    /// Compare-and-swap on `session.version()`; the stored version is
    /// incremented on success.
    ///
    /// # Errors
    ///
    /// - `OtpSessionNotFound` if the session doesn't exist
    /// - `ConcurrentModification` if the session changed since it was loaded
    async fn update(&self, session: &OtpSession) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &OtpSessionId) -> Result<Option<OtpSession>, DomainError>;
}
