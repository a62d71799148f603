use serde::{Deserialize, Serialize};

/// Limits applied to OTP sessions. Built from `OtpConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpPolicy {
    pub code_length: u8,
    pub ttl_secs: i64,
    pub max_attempts: u32,
    pub max_resends: u32,
    pub resend_cooldown_secs: i64,
    pub max_sessions_per_hour: u32,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            code_length: 6,
            ttl_secs: 300,
            max_attempts: 5,
            max_resends: 3,
            resend_cooldown_secs: 60,
            max_sessions_per_hour: 5,
        }
    }
}
