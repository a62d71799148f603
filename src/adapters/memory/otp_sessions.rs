//! In-memory OTP session repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, OtpSessionId, Timestamp};
use crate::domain::otp::OtpSession;
use crate::ports::OtpSessionRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryOtpSessionRepository {
    sessions: Arc<RwLock<HashMap<OtpSessionId, OtpSession>>>,
}

impl InMemoryOtpSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl OtpSessionRepository for InMemoryOtpSessionRepository {
    async fn save(&self, session: &OtpSession) -> Result<(), DomainError> {
        self.sessions
            .write()
            .await
            .insert(*session.id(), session.clone());
        Ok(())
    }

    async fn save_within_limit(
        &self,
        session: &OtpSession,
        since: &Timestamp,
        limit: u32,
    ) -> Result<bool, DomainError> {
        let mut sessions = self.sessions.write().await;
        let recent = sessions
            .values()
            .filter(|s| s.phone() == session.phone() && s.created_at() >= since)
            .count();
        if recent >= limit as usize {
            return Ok(false);
        }
        sessions.insert(*session.id(), session.clone());
        Ok(true)
    }

    async fn update(&self, session: &OtpSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        let existing = sessions.get_mut(session.id()).ok_or_else(|| {
            DomainError::not_found(ErrorCode::OtpSessionNotFound, "OTP session", session.id())
        })?;
        if existing.version() != session.version() {
            return Err(DomainError::concurrent_modification("OTP session", session.id()));
        }
        *existing = session.clone().with_version(session.version() + 1);
        Ok(())
    }

    async fn find_by_id(&self, id: &OtpSessionId) -> Result<Option<OtpSession>, DomainError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PhoneNumber;
    use crate::domain::otp::{OtpPolicy, OtpPurpose};

    fn session(phone: &PhoneNumber, created: Timestamp) -> OtpSession {
        OtpSession::start(
            OtpSessionId::new(),
            phone.clone(),
            OtpPurpose::Login,
            None,
            "hash".to_string(),
            &OtpPolicy::default(),
            created,
        )
    }

    #[tokio::test]
    async fn limit_counts_only_recent_sessions_for_the_same_phone() {
        let repo = InMemoryOtpSessionRepository::new();
        let phone = PhoneNumber::parse("+15551234567").unwrap();
        let other = PhoneNumber::parse("+15557654321").unwrap();
        let now = Timestamp::now();
        let window = now.minus_secs(3600);

        repo.save(&session(&phone, now.minus_secs(1800))).await.unwrap();
        repo.save(&session(&phone, now.minus_secs(7200))).await.unwrap();
        repo.save(&session(&other, now)).await.unwrap();
        repo.save(&session(&other, now)).await.unwrap();

        assert!(repo.save_within_limit(&session(&phone, now), &window, 2).await.unwrap());
        assert!(!repo.save_within_limit(&session(&phone, now), &window, 2).await.unwrap());
        assert_eq!(repo.len().await, 5);
    }

    #[tokio::test]
    async fn concurrent_requests_never_exceed_the_limit() {
        let repo = InMemoryOtpSessionRepository::new();
        let phone = PhoneNumber::parse("+15551234567").unwrap();
        let now = Timestamp::now();

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let repo = repo.clone();
                let s = session(&phone, now);
                tokio::spawn(async move {
                    repo.save_within_limit(&s, &now.minus_secs(3600), 5).await.unwrap()
                })
            })
            .collect();
        let mut stored = 0;
        for task in tasks {
            if task.await.unwrap() {
                stored += 1;
            }
        }

        assert_eq!(stored, 5);
        assert_eq!(repo.len().await, 5);
    }

    #[tokio::test]
    async fn stale_copy_cannot_overwrite_newer_state() {
        let repo = InMemoryOtpSessionRepository::new();
        let phone = PhoneNumber::parse("+15551234567").unwrap();
        let original = session(&phone, Timestamp::now());
        repo.save(&original).await.unwrap();

        let first = repo.find_by_id(original.id()).await.unwrap().unwrap();
        let second = first.clone();
        repo.update(&first).await.unwrap();

        let err = repo.update(&second).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConcurrentModification);
        let stored = repo.find_by_id(original.id()).await.unwrap().unwrap();
        assert_eq!(stored.version(), 1);
    }
}
