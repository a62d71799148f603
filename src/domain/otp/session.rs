//! OTP session aggregate.
//!
//! One session covers one code request and its resends. Raw codes are never
//! stored; only the HMAC digest is kept.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::code::hashes_match;
use super::{OtpError, OtpPolicy};
use crate::domain::foundation::{OtpSessionId, PhoneNumber, Timestamp, UserId, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    Login,
    PhoneChange,
}

impl OtpPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::Login => "login",
            OtpPurpose::PhoneChange => "phone_change",
        }
    }
}

impl fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OtpPurpose {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(OtpPurpose::Login),
            "phone_change" => Ok(OtpPurpose::PhoneChange),
            other => Err(ValidationError::invalid_format(
                "purpose",
                format!("unknown OTP purpose '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpStatus {
    Pending,
    Verified,
    Expired,
    Locked,
}

impl OtpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpStatus::Pending => "pending",
            OtpStatus::Verified => "verified",
            OtpStatus::Expired => "expired",
            OtpStatus::Locked => "locked",
        }
    }
}

impl FromStr for OtpStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OtpStatus::Pending),
            "verified" => Ok(OtpStatus::Verified),
            "expired" => Ok(OtpStatus::Expired),
            "locked" => Ok(OtpStatus::Locked),
            other => Err(ValidationError::invalid_format(
                "otp_status",
                format!("unknown OTP status '{}'", other),
            )),
        }
    }
}

/// # Invariants
///
/// - `attempts <= max_attempts`; reaching the limit locks the session
/// - `resend_count <= max_resends`
/// - Resending never resets `attempts`
/// - Once `Verified` or `Locked` the session accepts no further codes
/// - `version` is the stored revision this copy was loaded at; a write
///   from a stale copy is refused by the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpSession {
    id: OtpSessionId,
    phone: PhoneNumber,
    purpose: OtpPurpose,
    requested_by: Option<UserId>,
    code_hash: String,
    status: OtpStatus,
    attempts: u32,
    max_attempts: u32,
    resend_count: u32,
    max_resends: u32,
    resend_cooldown_secs: i64,
    last_sent_at: Timestamp,
    expires_at: Timestamp,
    created_at: Timestamp,
    verified_at: Option<Timestamp>,
    version: u32,
}

impl OtpSession {
    /// Starts a session. `id` must be the id the code hash was computed with.
    pub fn start(
        id: OtpSessionId,
        phone: PhoneNumber,
        purpose: OtpPurpose,
        requested_by: Option<UserId>,
        code_hash: String,
        policy: &OtpPolicy,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            phone,
            purpose,
            requested_by,
            code_hash,
            status: OtpStatus::Pending,
            attempts: 0,
            max_attempts: policy.max_attempts,
            resend_count: 0,
            max_resends: policy.max_resends,
            resend_cooldown_secs: policy.resend_cooldown_secs,
            last_sent_at: now,
            expires_at: now.plus_secs(policy.ttl_secs),
            created_at: now,
            verified_at: None,
            version: 0,
        }
    }

    /// Reconstitute a session from persistence.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: OtpSessionId,
        phone: PhoneNumber,
        purpose: OtpPurpose,
        requested_by: Option<UserId>,
        code_hash: String,
        status: OtpStatus,
        attempts: u32,
        max_attempts: u32,
        resend_count: u32,
        max_resends: u32,
        resend_cooldown_secs: i64,
        last_sent_at: Timestamp,
        expires_at: Timestamp,
        created_at: Timestamp,
        verified_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            phone,
            purpose,
            requested_by,
            code_hash,
            status,
            attempts,
            max_attempts,
            resend_count,
            max_resends,
            resend_cooldown_secs,
            last_sent_at,
            expires_at,
            created_at,
            verified_at,
            version: 0,
        }
    }

    /// Sets the stored revision; used by repositories when loading.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &OtpSessionId {
        &self.id
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn purpose(&self) -> OtpPurpose {
        self.purpose
    }

    pub fn requested_by(&self) -> Option<&UserId> {
        self.requested_by.as_ref()
    }

    pub fn code_hash(&self) -> &str {
        &self.code_hash
    }

    pub fn status(&self) -> OtpStatus {
        self.status
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn remaining_attempts(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts)
    }

    pub fn resend_count(&self) -> u32 {
        self.resend_count
    }

    pub fn max_resends(&self) -> u32 {
        self.max_resends
    }

    pub fn resend_cooldown_secs(&self) -> i64 {
        self.resend_cooldown_secs
    }

    pub fn last_sent_at(&self) -> &Timestamp {
        &self.last_sent_at
    }

    pub fn expires_at(&self) -> &Timestamp {
        &self.expires_at
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn verified_at(&self) -> Option<&Timestamp> {
        self.verified_at.as_ref()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn is_expired(&self, now: &Timestamp) -> bool {
        !now.is_before(&self.expires_at)
    }

    /// Earliest moment a resend is allowed.
    pub fn next_resend_at(&self) -> Timestamp {
        self.last_sent_at.plus_secs(self.resend_cooldown_secs)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Resend
    // ─────────────────────────────────────────────────────────────────────────

    /// Checks that a new code may be sent for this session now.
    ///
    /// A session whose code timed out may still be resent; that is the
    /// usual reason to ask for a new code.
    pub fn ensure_can_resend(&self, now: &Timestamp) -> Result<(), OtpError> {
        match self.status {
            OtpStatus::Verified => return Err(OtpError::AlreadyVerified),
            OtpStatus::Locked => return Err(OtpError::TooManyAttempts),
            OtpStatus::Pending | OtpStatus::Expired => {}
        }
        if self.resend_count >= self.max_resends {
            return Err(OtpError::ResendLimitReached);
        }
        let next = self.next_resend_at();
        if now.is_before(&next) {
            let wait = next.duration_since(now).num_seconds().max(1);
            return Err(OtpError::ResendCooldown {
                retry_after_secs: wait,
            });
        }
        Ok(())
    }

    /// Swaps in a new code. Attempts already spent stay spent.
    pub fn resend(
        &mut self,
        new_hash: String,
        ttl_secs: i64,
        now: Timestamp,
    ) -> Result<(), OtpError> {
        self.ensure_can_resend(&now)?;
        self.code_hash = new_hash;
        self.resend_count += 1;
        self.status = OtpStatus::Pending;
        self.last_sent_at = now;
        self.expires_at = now.plus_secs(ttl_secs);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verify
    // ─────────────────────────────────────────────────────────────────────────

    /// Checks a candidate hash. Every call that reaches the comparison
    /// consumes one attempt, whether it matches or not.
    pub fn verify(&mut self, candidate_hash: &str, now: Timestamp) -> Result<(), OtpError> {
        match self.status {
            OtpStatus::Verified => return Err(OtpError::AlreadyVerified),
            OtpStatus::Locked => return Err(OtpError::TooManyAttempts),
            OtpStatus::Expired => return Err(OtpError::Expired),
            OtpStatus::Pending => {}
        }
        if self.is_expired(&now) {
            self.status = OtpStatus::Expired;
            return Err(OtpError::Expired);
        }

        self.attempts += 1;
        if hashes_match(&self.code_hash, candidate_hash) {
            self.status = OtpStatus::Verified;
            self.verified_at = Some(now);
            return Ok(());
        }

        if self.attempts >= self.max_attempts {
            self.status = OtpStatus::Locked;
            return Err(OtpError::TooManyAttempts);
        }
        Err(OtpError::InvalidCode {
            remaining_attempts: self.remaining_attempts(),
        })
    }
}
