//! One-time code generation and hashing.

use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::foundation::{OtpSessionId, ValidationError};

type HmacSha256 = Hmac<Sha256>;

/// A freshly generated numeric code. Only ever held in memory long enough
/// to hash it and hand it to the sender.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    pub fn generate(length: u8) -> Self {
        let mut rng = OsRng;
        let code = (0..length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OtpCode(***)")
    }
}

/// HMAC-SHA256 over `"{session_id}:{code}"`, hex encoded.
///
/// A hash computed for one session never verifies against another.
#[derive(Clone)]
pub struct OtpHasher {
    mac: HmacSha256,
}

impl OtpHasher {
    pub fn new(secret: &SecretString) -> Result<Self, ValidationError> {
        let key = secret.expose_secret();
        if key.is_empty() {
            return Err(ValidationError::empty_field("otp.hash_secret"));
        }
        let mac = HmacSha256::new_from_slice(key.as_bytes())
            .map_err(|e| ValidationError::invalid_format("otp.hash_secret", e.to_string()))?;
        Ok(Self { mac })
    }

    pub fn hash(&self, session_id: &OtpSessionId, code: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(session_id.to_string().as_bytes());
        mac.update(b":");
        mac.update(code.trim().as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl std::fmt::Debug for OtpHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OtpHasher")
    }
}

/// Constant-time comparison of two hex digests.
pub fn hashes_match(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> OtpHasher {
        OtpHasher::new(&SecretString::new("test-secret".to_string())).unwrap()
    }

    #[test]
    fn generated_code_has_requested_length_and_digits() {
        for len in [4u8, 6, 8] {
            let code = OtpCode::generate(len);
            assert_eq!(code.as_str().len(), len as usize);
            assert!(code.as_str().chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn debug_hides_code() {
        assert_eq!(format!("{:?}", OtpCode::generate(6)), "OtpCode(***)");
    }

    #[test]
    fn hash_is_deterministic_and_hex() {
        let id = OtpSessionId::new();
        let h1 = hasher().hash(&id, "123456");
        let h2 = hasher().hash(&id, "123456");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hash_binds_session_and_code() {
        let h = hasher();
        let id = OtpSessionId::new();
        assert_ne!(h.hash(&id, "123456"), h.hash(&id, "123457"));
        assert_ne!(h.hash(&id, "123456"), h.hash(&OtpSessionId::new(), "123456"));
    }

    #[test]
    fn different_secrets_give_different_hashes() {
        let id = OtpSessionId::new();
        let other = OtpHasher::new(&SecretString::new("other".to_string())).unwrap();
        assert_ne!(hasher().hash(&id, "1"), other.hash(&id, "1"));
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(OtpHasher::new(&SecretString::new(String::new())).is_err());
    }

    #[test]
    fn hashes_match_compares_exactly() {
        assert!(hashes_match("abc", "abc"));
        assert!(!hashes_match("abc", "abd"));
        assert!(!hashes_match("abc", "abcd"));
    }
}
