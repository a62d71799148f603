//! User repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Page, PageRequest, PhoneNumber, Role, UserId};
use crate::domain::user::{CardNumber, User, UserStatus};

/// Criteria for the admin user list, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    /// Substring over phone, name and email.
    pub query: Option<String>,
    pub page: PageRequest,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        if self.role.map_or(false, |r| user.role() != r) {
            return false;
        }
        if self.status.map_or(false, |s| user.status() != s) {
            return false;
        }
        match self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => {
                let q = q.to_lowercase();
                user.phone().as_str().contains(&q)
                    || user.name().map_or(false, |n| n.to_lowercase().contains(&q))
                    || user.email().map_or(false, |e| e.as_str().contains(&q))
            }
            None => true,
        }
    }
}

/// Repository port for User aggregate persistence.
///
/// Implementations must keep `phone` and card numbers unique and report a
/// clash as `PhoneAlreadyRegistered`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Save a new user.
    ///
    /// # Errors
    ///
    /// - `PhoneAlreadyRegistered` if another user has the phone number
    /// - `DatabaseError` on persistence failure
    async fn save(&self, user: &User) -> Result<(), DomainError>;

    /// Update an existing user, card included.
    ///
    /// The write only lands if the stored version still equals
    /// `user.version()`; the stored version is then incremented.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user doesn't exist
    /// - `ConcurrentModification` if the user changed since it was loaded
    /// - `PhoneAlreadyRegistered` if the new phone is taken
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<User>, DomainError>;

    /// Finds the holder of a card.
    async fn find_by_card_number(&self, number: &CardNumber) -> Result<Option<User>, DomainError>;

    async fn list(&self, filter: &UserFilter) -> Result<Page<User>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn UserRepository) {}
    }

    #[test]
    fn filter_matches_query_over_name_and_phone() {
        let mut user = User::register(PhoneNumber::parse("+15551234567").unwrap(), Role::Customer);
        user.update_profile(Some("Grace Hopper".into()), None).unwrap();

        let by_name = UserFilter {
            query: Some("hopper".into()),
            ..Default::default()
        };
        assert!(by_name.matches(&user));

        let by_phone = UserFilter {
            query: Some("555123".into()),
            ..Default::default()
        };
        assert!(by_phone.matches(&user));

        let admins = UserFilter {
            role: Some(Role::Admin),
            ..Default::default()
        };
        assert!(!admins.matches(&user));
    }
}
