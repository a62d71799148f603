//! UpdateProfileHandler - Lets a user edit their own name and email.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Email, ErrorCode, UserId};
use crate::domain::user::User;
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct UpdateProfileCommand {
    pub user_id: UserId,
    pub name: Option<String>,
    pub email: Option<Email>,
}

pub struct UpdateProfileHandler {
    users: Arc<dyn UserRepository>,
}

impl UpdateProfileHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: UpdateProfileCommand) -> Result<User, DomainError> {
        let mut user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::UserNotFound, "User", cmd.user_id))?;

        user.update_profile(cmd.name, cmd.email)?;
        self.users.update(&user).await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::foundation::{PhoneNumber, Role};

    #[tokio::test]
    async fn updates_and_persists_profile() {
        let repo = InMemoryUserRepository::new();
        let user = User::register(PhoneNumber::parse("+15551234567").unwrap(), Role::Customer);
        repo.save(&user).await.unwrap();
        let handler = UpdateProfileHandler::new(Arc::new(repo.clone()));

        let updated = handler
            .handle(UpdateProfileCommand {
                user_id: *user.id(),
                name: Some("  Ada Lovelace ".into()),
                email: Some(Email::parse("ada@example.com").unwrap()),
            })
            .await
            .unwrap();

        assert_eq!(updated.name(), Some("Ada Lovelace"));
        let stored = repo.find_by_id(user.id()).await.unwrap().unwrap();
        assert_eq!(stored.email().map(Email::as_str), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn rejects_overlong_name() {
        let repo = InMemoryUserRepository::new();
        let user = User::register(PhoneNumber::parse("+15551234567").unwrap(), Role::Customer);
        repo.save(&user).await.unwrap();
        let handler = UpdateProfileHandler::new(Arc::new(repo));

        let err = handler
            .handle(UpdateProfileCommand {
                user_id: *user.id(),
                name: Some("x".repeat(101)),
                email: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
