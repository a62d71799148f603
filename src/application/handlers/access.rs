//! Role checks shared by handlers.

use crate::domain::foundation::{AuthenticatedUser, DomainError, Role};

pub(crate) fn require_admin(actor: &AuthenticatedUser) -> Result<(), DomainError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(DomainError::forbidden("Admin role required"))
    }
}

/// Shop owners and admins may run shop-side operations.
pub(crate) fn require_merchant(actor: &AuthenticatedUser) -> Result<(), DomainError> {
    match actor.role {
        Role::Admin | Role::ShopOwner => Ok(()),
        Role::Customer => Err(DomainError::forbidden("Shop owner or admin role required")),
    }
}
