//! VerifyOtpHandler - Checks a code and completes login or phone change.

use std::sync::Arc;

use crate::domain::foundation::{
    AuthenticatedUser, DomainError, ErrorCode, OtpSessionId, Role, Timestamp,
};
use crate::domain::otp::{OtpHasher, OtpPurpose, OtpSession};
use crate::domain::user::User;
use crate::ports::{IssuedToken, OtpSessionRepository, TokenIssuer, UserRepository};

/// Load-verify-store rounds before a contended session gives up with 409.
const MAX_VERIFY_ROUNDS: u32 = 8;

fn is_conflict(err: &DomainError) -> bool {
    err.code == ErrorCode::ConcurrentModification
}

#[derive(Debug, Clone)]
pub struct VerifyOtpCommand {
    pub session_id: OtpSessionId,
    pub code: String,
    /// Present when the request carried a valid bearer token.
    pub caller: Option<AuthenticatedUser>,
}

#[derive(Debug, Clone)]
pub struct VerifyOtpResult {
    pub purpose: OtpPurpose,
    pub user: User,
    pub token: IssuedToken,
    /// True when this login created the account.
    pub is_new_user: bool,
}

/// Handler for OTP verification.
///
/// Login verifies the phone and signs the user in, registering a customer
/// account on first login. Phone change moves the caller to the verified
/// number. Both return a fresh access token.
///
/// Every guess is evaluated against the latest stored session. When another
/// request updated the session between load and store, the guess is
/// re-evaluated on the fresh copy, so parallel wrong guesses still add up
/// to a lock.
pub struct VerifyOtpHandler {
    sessions: Arc<dyn OtpSessionRepository>,
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenIssuer>,
    hasher: OtpHasher,
}

impl VerifyOtpHandler {
    pub fn new(
        sessions: Arc<dyn OtpSessionRepository>,
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenIssuer>,
        hasher: OtpHasher,
    ) -> Self {
        Self {
            sessions,
            users,
            tokens,
            hasher,
        }
    }

    pub async fn handle(&self, cmd: VerifyOtpCommand) -> Result<VerifyOtpResult, DomainError> {
        let now = Timestamp::now();

        let mut round = 1;
        let session = loop {
            let mut session = self.load(&cmd).await?;

            // 3. Verify; attempts are persisted whether or not the code matched
            let candidate = self.hasher.hash(session.id(), &cmd.code);
            let outcome = session.verify(&candidate, now);
            match self.sessions.update(&session).await {
                Ok(()) => {}
                Err(err) if is_conflict(&err) && round < MAX_VERIFY_ROUNDS => {
                    tracing::debug!(
                        session_id = %session.id(),
                        round,
                        "OTP session changed, re-evaluating guess"
                    );
                    round += 1;
                    continue;
                }
                Err(err) => return Err(err),
            }
            if let Err(err) = outcome {
                tracing::warn!(session_id = %session.id(), error = %err, "OTP verification rejected");
                return Err(err.into());
            }
            break session;
        };

        // 4. Complete the flow
        let (user, is_new_user) = match session.purpose() {
            OtpPurpose::Login => self.login(&session, now).await?,
            OtpPurpose::PhoneChange => (self.change_phone(&session).await?, false),
        };

        let token = self.tokens.issue(&user).await?;
        Ok(VerifyOtpResult {
            purpose: session.purpose(),
            user,
            token,
            is_new_user,
        })
    }

    async fn load(&self, cmd: &VerifyOtpCommand) -> Result<OtpSession, DomainError> {
        // 1. Load session
        let session = self
            .sessions
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(ErrorCode::OtpSessionNotFound, "OTP session", cmd.session_id)
            })?;

        // 2. Phone change codes only work for the user who asked for them
        if session.purpose() == OtpPurpose::PhoneChange {
            let caller = cmd.caller.as_ref().ok_or_else(|| {
                DomainError::new(ErrorCode::Unauthorized, "Phone change requires a signed-in user")
            })?;
            if session.requested_by() != Some(&caller.id) {
                return Err(DomainError::forbidden("OTP session belongs to another user"));
            }
        }
        Ok(session)
    }

    async fn login(&self, session: &OtpSession, now: Timestamp) -> Result<(User, bool), DomainError> {
        let mut registered = false;
        let mut round = 1;
        loop {
            let (mut user, is_new_user) = self.find_or_register(session).await?;
            registered |= is_new_user;

            if let Err(err) = user.record_login(now) {
                tracing::warn!(user_id = %user.id(), "Login refused for suspended account");
                return Err(err);
            }
            match self.users.update(&user).await {
                Ok(()) => return Ok((user, registered)),
                // Reloaded so a concurrent suspension is seen by record_login.
                Err(err) if is_conflict(&err) && round < MAX_VERIFY_ROUNDS => round += 1,
                Err(err) => return Err(err),
            }
        }
    }

    async fn find_or_register(&self, session: &OtpSession) -> Result<(User, bool), DomainError> {
        Ok(match self.users.find_by_phone(session.phone()).await? {
            Some(user) => (user, false),
            None => {
                let user = User::register(session.phone().clone(), Role::Customer);
                match self.users.save(&user).await {
                    Ok(()) => {
                        tracing::info!(user_id = %user.id(), "Registered user on first login");
                        (user, true)
                    }
                    // A concurrent login registered the same phone first.
                    Err(err) if err.code == ErrorCode::PhoneAlreadyRegistered => {
                        let existing = self.users.find_by_phone(session.phone()).await?;
                        (existing.ok_or(err)?, false)
                    }
                    Err(err) => return Err(err),
                }
            }
        })
    }

    async fn change_phone(&self, session: &OtpSession) -> Result<User, DomainError> {
        let user_id = session
            .requested_by()
            .ok_or_else(|| DomainError::new(ErrorCode::InternalError, "Phone change without requester"))?;

        if let Some(owner) = self.users.find_by_phone(session.phone()).await? {
            if owner.id() != user_id {
                return Err(DomainError::new(
                    ErrorCode::PhoneAlreadyRegistered,
                    "Phone number is already registered",
                ));
            }
        }

        let mut round = 1;
        loop {
            let mut user = self
                .users
                .find_by_id(user_id)
                .await?
                .ok_or_else(|| DomainError::not_found(ErrorCode::UserNotFound, "User", user_id))?;
            user.ensure_can_login()?;
            user.change_phone(session.phone().clone());
            match self.users.update(&user).await {
                Ok(()) => {
                    tracing::info!(user_id = %user.id(), "Phone number changed");
                    return Ok(user);
                }
                Err(err) if is_conflict(&err) && round < MAX_VERIFY_ROUNDS => round += 1,
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockTokenIssuer;
    use crate::adapters::memory::{InMemoryOtpSessionRepository, InMemoryUserRepository};
    use crate::domain::foundation::{Page, PhoneNumber, UserId};
    use crate::domain::otp::{OtpPolicy, OtpStatus};
    use crate::domain::user::CardNumber;
    use crate::ports::UserFilter;
    use async_trait::async_trait;
    use secrecy::SecretString;
    use std::time::Duration;
    use tokio::sync::Mutex;

    /// Holds every read long enough for parallel requests to load the same copy.
    struct SlowReads {
        inner: InMemoryOtpSessionRepository,
    }

    #[async_trait]
    impl OtpSessionRepository for SlowReads {
        async fn save(&self, session: &OtpSession) -> Result<(), DomainError> {
            self.inner.save(session).await
        }

        async fn save_within_limit(
            &self,
            session: &OtpSession,
            since: &Timestamp,
            limit: u32,
        ) -> Result<bool, DomainError> {
            self.inner.save_within_limit(session, since, limit).await
        }

        async fn update(&self, session: &OtpSession) -> Result<(), DomainError> {
            self.inner.update(session).await
        }

        async fn find_by_id(&self, id: &OtpSessionId) -> Result<Option<OtpSession>, DomainError> {
            let found = self.inner.find_by_id(id).await;
            tokio::time::sleep(Duration::from_millis(20)).await;
            found
        }
    }

    /// Suspends the account right after the first phone lookup, as an admin
    /// acting between a login's load and store would.
    struct SuspendAfterLookup {
        inner: InMemoryUserRepository,
        fired: Mutex<bool>,
    }

    #[async_trait]
    impl UserRepository for SuspendAfterLookup {
        async fn save(&self, user: &User) -> Result<(), DomainError> {
            self.inner.save(user).await
        }

        async fn update(&self, user: &User) -> Result<(), DomainError> {
            self.inner.update(user).await
        }

        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<User>, DomainError> {
            let found = self.inner.find_by_phone(phone).await?;
            let mut fired = self.fired.lock().await;
            if let (Some(user), false) = (&found, *fired) {
                *fired = true;
                let mut admin_copy = user.clone();
                admin_copy.suspend()?;
                self.inner.update(&admin_copy).await?;
            }
            Ok(found)
        }

        async fn find_by_card_number(
            &self,
            number: &CardNumber,
        ) -> Result<Option<User>, DomainError> {
            self.inner.find_by_card_number(number).await
        }

        async fn list(&self, filter: &UserFilter) -> Result<Page<User>, DomainError> {
            self.inner.list(filter).await
        }
    }

    const CODE: &str = "123456";

    fn hasher() -> OtpHasher {
        OtpHasher::new(&SecretString::new("test-otp-secret".into())).unwrap()
    }

    fn phone(s: &str) -> PhoneNumber {
        PhoneNumber::parse(s).unwrap()
    }

    struct Fixture {
        sessions: InMemoryOtpSessionRepository,
        users: InMemoryUserRepository,
        handler: VerifyOtpHandler,
    }

    fn fixture() -> Fixture {
        let sessions = InMemoryOtpSessionRepository::new();
        let users = InMemoryUserRepository::new();
        let handler = VerifyOtpHandler::new(
            Arc::new(sessions.clone()),
            Arc::new(users.clone()),
            Arc::new(MockTokenIssuer::new()),
            hasher(),
        );
        Fixture {
            sessions,
            users,
            handler,
        }
    }

    async fn start(
        f: &Fixture,
        phone: PhoneNumber,
        purpose: OtpPurpose,
        requested_by: Option<UserId>,
    ) -> OtpSessionId {
        let id = OtpSessionId::new();
        let session = OtpSession::start(
            id,
            phone,
            purpose,
            requested_by,
            hasher().hash(&id, CODE),
            &OtpPolicy::default(),
            Timestamp::now(),
        );
        f.sessions.save(&session).await.unwrap();
        id
    }

    fn verify(session_id: OtpSessionId, code: &str) -> VerifyOtpCommand {
        VerifyOtpCommand {
            session_id,
            code: code.to_string(),
            caller: None,
        }
    }

    #[tokio::test]
    async fn first_login_registers_customer() {
        let f = fixture();
        let id = start(&f, phone("+15551234567"), OtpPurpose::Login, None).await;

        let result = f.handler.handle(verify(id, CODE)).await.unwrap();

        assert!(result.is_new_user);
        assert_eq!(result.user.role(), Role::Customer);
        assert!(result.user.last_login_at().is_some());
        assert_eq!(result.token.token_type, "Bearer");
        assert_eq!(f.users.all().await.len(), 1);
    }

    #[tokio::test]
    async fn existing_user_logs_in() {
        let f = fixture();
        let existing = User::register(phone("+15551234567"), Role::ShopOwner);
        f.users.save(&existing).await.unwrap();
        let id = start(&f, phone("+15551234567"), OtpPurpose::Login, None).await;

        let result = f.handler.handle(verify(id, CODE)).await.unwrap();

        assert!(!result.is_new_user);
        assert_eq!(result.user.id(), existing.id());
    }

    #[tokio::test]
    async fn wrong_code_consumes_an_attempt() {
        let f = fixture();
        let id = start(&f, phone("+15551234567"), OtpPurpose::Login, None).await;

        let err = f.handler.handle(verify(id, "000000")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::OtpInvalidCode);
        let stored = f.sessions.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.attempts(), 1);
        assert!(f.users.all().await.is_empty());
    }

    #[tokio::test]
    async fn code_cannot_be_reused() {
        let f = fixture();
        let id = start(&f, phone("+15551234567"), OtpPurpose::Login, None).await;
        f.handler.handle(verify(id, CODE)).await.unwrap();

        let err = f.handler.handle(verify(id, CODE)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OtpAlreadyVerified);
        let stored = f.sessions.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.status(), OtpStatus::Verified);
    }

    #[tokio::test]
    async fn suspended_user_cannot_log_in() {
        let f = fixture();
        let mut user = User::register(phone("+15551234567"), Role::Customer);
        user.suspend().unwrap();
        f.users.save(&user).await.unwrap();
        let id = start(&f, phone("+15551234567"), OtpPurpose::Login, None).await;

        let err = f.handler.handle(verify(id, CODE)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountSuspended);
    }

    #[tokio::test]
    async fn parallel_wrong_guesses_still_lock_the_session() {
        let sessions = InMemoryOtpSessionRepository::new();
        let policy = OtpPolicy {
            max_attempts: 5,
            ..OtpPolicy::default()
        };
        let id = OtpSessionId::new();
        let session = OtpSession::start(
            id,
            phone("+15551234567"),
            OtpPurpose::Login,
            None,
            hasher().hash(&id, CODE),
            &policy,
            Timestamp::now(),
        );
        sessions.save(&session).await.unwrap();

        let handler = Arc::new(VerifyOtpHandler::new(
            Arc::new(SlowReads {
                inner: sessions.clone(),
            }),
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(MockTokenIssuer::new()),
            hasher(),
        ));

        let guesses: Vec<_> = (0..20)
            .map(|i| {
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    handler.handle(verify(id, &format!("{:06}", 900_000 + i))).await
                })
            })
            .collect();

        let mut invalid = 0;
        for guess in guesses {
            let err = guess.await.unwrap().unwrap_err();
            match err.code {
                ErrorCode::OtpInvalidCode => invalid += 1,
                ErrorCode::OtpTooManyAttempts | ErrorCode::ConcurrentModification => {}
                other => panic!("unexpected error {:?}", other),
            }
        }

        let stored = sessions.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.status(), OtpStatus::Locked);
        assert_eq!(stored.attempts(), 5);
        assert_eq!(invalid, 4);
    }

    #[tokio::test]
    async fn parallel_correct_codes_log_in_once() {
        let sessions = InMemoryOtpSessionRepository::new();
        let users = InMemoryUserRepository::new();
        let id = OtpSessionId::new();
        sessions
            .save(&OtpSession::start(
                id,
                phone("+15551234567"),
                OtpPurpose::Login,
                None,
                hasher().hash(&id, CODE),
                &OtpPolicy::default(),
                Timestamp::now(),
            ))
            .await
            .unwrap();
        let handler = Arc::new(VerifyOtpHandler::new(
            Arc::new(SlowReads {
                inner: sessions.clone(),
            }),
            Arc::new(users.clone()),
            Arc::new(MockTokenIssuer::new()),
            hasher(),
        ));

        let a = tokio::spawn({
            let handler = Arc::clone(&handler);
            async move { handler.handle(verify(id, CODE)).await }
        });
        let b = tokio::spawn({
            let handler = Arc::clone(&handler);
            async move { handler.handle(verify(id, CODE)).await }
        });
        let results = [a.await.unwrap(), b.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let err = results.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert_eq!(err.code, ErrorCode::OtpAlreadyVerified);
        assert_eq!(users.all().await.len(), 1);
    }

    #[tokio::test]
    async fn login_racing_a_suspension_is_refused() {
        let sessions = InMemoryOtpSessionRepository::new();
        let users = InMemoryUserRepository::new();
        let user = User::register(phone("+15551234567"), Role::Customer);
        users.save(&user).await.unwrap();
        let handler = VerifyOtpHandler::new(
            Arc::new(sessions.clone()),
            Arc::new(SuspendAfterLookup {
                inner: users.clone(),
                fired: Mutex::new(false),
            }),
            Arc::new(MockTokenIssuer::new()),
            hasher(),
        );
        let id = OtpSessionId::new();
        sessions
            .save(&OtpSession::start(
                id,
                phone("+15551234567"),
                OtpPurpose::Login,
                None,
                hasher().hash(&id, CODE),
                &OtpPolicy::default(),
                Timestamp::now(),
            ))
            .await
            .unwrap();

        let err = handler.handle(verify(id, CODE)).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::AccountSuspended);
        let stored = users.find_by_id(user.id()).await.unwrap().unwrap();
        assert!(!stored.is_active());
        assert!(stored.last_login_at().is_none());
    }

    #[tokio::test]
    async fn phone_change_moves_caller_to_new_number() {
        let f = fixture();
        let user = User::register(phone("+15551234567"), Role::Customer);
        f.users.save(&user).await.unwrap();
        let id = start(&f, phone("+15559876543"), OtpPurpose::PhoneChange, Some(*user.id())).await;

        let cmd = VerifyOtpCommand {
            caller: Some(AuthenticatedUser::new(*user.id(), user.phone().clone(), Role::Customer)),
            ..verify(id, CODE)
        };
        let result = f.handler.handle(cmd).await.unwrap();

        assert_eq!(result.user.phone().as_str(), "+15559876543");
        let stored = f.users.find_by_id(user.id()).await.unwrap().unwrap();
        assert_eq!(stored.phone().as_str(), "+15559876543");
    }

    #[tokio::test]
    async fn phone_change_rejects_other_caller() {
        let f = fixture();
        let owner = UserId::new();
        let id = start(&f, phone("+15559876543"), OtpPurpose::PhoneChange, Some(owner)).await;

        let cmd = VerifyOtpCommand {
            caller: Some(AuthenticatedUser::new(
                UserId::new(),
                phone("+15550000000"),
                Role::Customer,
            )),
            ..verify(id, CODE)
        };
        let err = f.handler.handle(cmd).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let stored = f.sessions.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.attempts(), 0);
    }
}
