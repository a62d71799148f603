//! ManageUserHandler - Admin changes to a user's role and status.

use std::sync::Arc;

use crate::application::handlers::access::require_admin;
use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, Role, UserId};
use crate::domain::user::User;
use crate::ports::UserRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    ChangeRole(Role),
    Suspend,
    Reactivate,
}

#[derive(Debug, Clone)]
pub struct ManageUserCommand {
    pub actor: AuthenticatedUser,
    pub user_id: UserId,
    pub action: UserAction,
}

/// Admins cannot suspend or demote themselves, so the platform always
/// keeps at least the acting admin.
pub struct ManageUserHandler {
    users: Arc<dyn UserRepository>,
}

impl ManageUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: ManageUserCommand) -> Result<User, DomainError> {
        require_admin(&cmd.actor)?;

        let self_lockout = match cmd.action {
            UserAction::Suspend => true,
            UserAction::ChangeRole(role) => role != Role::Admin,
            UserAction::Reactivate => false,
        };
        if cmd.actor.id == cmd.user_id && self_lockout {
            return Err(DomainError::forbidden("Admins cannot suspend or demote themselves"));
        }

        let mut user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::UserNotFound, "User", cmd.user_id))?;

        match cmd.action {
            UserAction::ChangeRole(role) => user.change_role(role),
            UserAction::Suspend => user.suspend()?,
            UserAction::Reactivate => user.reactivate()?,
        }
        self.users.update(&user).await?;

        tracing::info!(
            user_id = %user.id(),
            actor = %cmd.actor.id,
            action = ?cmd.action,
            "User updated by admin"
        );
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::foundation::PhoneNumber;
    use crate::domain::user::UserStatus;

    fn admin() -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new(),
            PhoneNumber::parse("+15550000009").unwrap(),
            Role::Admin,
        )
    }

    async fn seeded() -> (ManageUserHandler, InMemoryUserRepository, User) {
        let repo = InMemoryUserRepository::new();
        let user = User::register(PhoneNumber::parse("+15551234567").unwrap(), Role::Customer);
        repo.save(&user).await.unwrap();
        (ManageUserHandler::new(Arc::new(repo.clone())), repo, user)
    }

    #[tokio::test]
    async fn admin_promotes_to_shop_owner() {
        let (handler, repo, user) = seeded().await;

        handler
            .handle(ManageUserCommand {
                actor: admin(),
                user_id: *user.id(),
                action: UserAction::ChangeRole(Role::ShopOwner),
            })
            .await
            .unwrap();

        let stored = repo.find_by_id(user.id()).await.unwrap().unwrap();
        assert_eq!(stored.role(), Role::ShopOwner);
    }

    #[tokio::test]
    async fn suspend_then_reactivate() {
        let (handler, _, user) = seeded().await;
        let cmd = |action| ManageUserCommand {
            actor: admin(),
            user_id: *user.id(),
            action,
        };

        let suspended = handler.handle(cmd(UserAction::Suspend)).await.unwrap();
        assert_eq!(suspended.status(), UserStatus::Suspended);

        let err = handler.handle(cmd(UserAction::Suspend)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);

        let active = handler.handle(cmd(UserAction::Reactivate)).await.unwrap();
        assert_eq!(active.status(), UserStatus::Active);
    }

    #[tokio::test]
    async fn admin_cannot_suspend_self() {
        let (handler, _, _) = seeded().await;
        let me = admin();
        let err = handler
            .handle(ManageUserCommand {
                user_id: me.id,
                actor: me,
                action: UserAction::Suspend,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn non_admin_is_forbidden() {
        let (handler, _, user) = seeded().await;
        let actor = AuthenticatedUser::new(*user.id(), user.phone().clone(), Role::ShopOwner);
        let err = handler
            .handle(ManageUserCommand {
                actor,
                user_id: *user.id(),
                action: UserAction::ChangeRole(Role::Admin),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
