//! Shop aggregate.

use serde::{Deserialize, Serialize};

use super::{ShopCategory, ShopStatus};
use crate::domain::foundation::{
    DomainError, ErrorCode, GeoPoint, PhoneNumber, ShopId, StateMachine, Timestamp, UserId,
    ValidationError,
};

pub const MAX_SHOP_NAME_LENGTH: usize = 120;
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Editable details of a shop, validated as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopDetails {
    pub name: String,
    pub description: Option<String>,
    pub category: ShopCategory,
    pub address: String,
    pub location: GeoPoint,
    pub phone: Option<PhoneNumber>,
}

impl ShopDetails {
    /// Trims text fields and checks lengths.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        let len = self.name.chars().count();
        if len > MAX_SHOP_NAME_LENGTH {
            return Err(ValidationError::out_of_range(
                "name",
                1,
                MAX_SHOP_NAME_LENGTH as i64,
                len as i64,
            ));
        }

        self.address = self.address.trim().to_string();
        if self.address.is_empty() {
            return Err(ValidationError::empty_field("address"));
        }

        self.description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if let Some(d) = &self.description {
            let len = d.chars().count();
            if len > MAX_DESCRIPTION_LENGTH {
                return Err(ValidationError::out_of_range(
                    "description",
                    0,
                    MAX_DESCRIPTION_LENGTH as i64,
                    len as i64,
                ));
            }
        }
        Ok(self)
    }
}

/// A partner shop that accepts discount cards.
///
/// # Invariants
///
/// - `name` is 1-120 characters, `address` non-empty
/// - Only `Active` shops accept cards
/// - `Closed` is final
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    id: ShopId,
    owner_id: UserId,
    name: String,
    description: Option<String>,
    category: ShopCategory,
    address: String,
    location: GeoPoint,
    phone: Option<PhoneNumber>,
    status: ShopStatus,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Shop {
    /// Registers a shop awaiting admin approval.
    pub fn register(owner_id: UserId, details: ShopDetails) -> Result<Self, DomainError> {
        let details = details.validated()?;
        let now = Timestamp::now();
        Ok(Self {
            id: ShopId::new(),
            owner_id,
            name: details.name,
            description: details.description,
            category: details.category,
            address: details.address,
            location: details.location,
            phone: details.phone,
            status: ShopStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a shop from persistence.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ShopId,
        owner_id: UserId,
        name: String,
        description: Option<String>,
        category: ShopCategory,
        address: String,
        location: GeoPoint,
        phone: Option<PhoneNumber>,
        status: ShopStatus,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner_id,
            name,
            description,
            category,
            address,
            location,
            phone,
            status,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &ShopId {
        &self.id
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn category(&self) -> ShopCategory {
        self.category
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn location(&self) -> &GeoPoint {
        &self.location
    }

    pub fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }

    pub fn status(&self) -> ShopStatus {
        self.status
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn is_accepting_cards(&self) -> bool {
        self.status == ShopStatus::Active
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_owner(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }

    /// Allows the owner or an admin through.
    pub fn authorize_manage(&self, user_id: &UserId, is_admin: bool) -> Result<(), DomainError> {
        if is_admin || self.is_owner(user_id) {
            Ok(())
        } else {
            Err(DomainError::forbidden("Only the shop owner or an admin can manage this shop"))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn update_details(&mut self, details: ShopDetails) -> Result<(), DomainError> {
        if self.status == ShopStatus::Closed {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Closed shops cannot be edited",
            ));
        }
        let details = details.validated()?;
        self.name = details.name;
        self.description = details.description;
        self.category = details.category;
        self.address = details.address;
        self.location = details.location;
        self.phone = details.phone;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn approve(&mut self) -> Result<(), DomainError> {
        if self.status != ShopStatus::Pending {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Only pending shops can be approved",
            ));
        }
        self.move_to(ShopStatus::Active)
    }

    pub fn suspend(&mut self) -> Result<(), DomainError> {
        self.move_to(ShopStatus::Suspended)
    }

    pub fn reinstate(&mut self) -> Result<(), DomainError> {
        if self.status != ShopStatus::Suspended {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Only suspended shops can be reinstated",
            ));
        }
        self.move_to(ShopStatus::Active)
    }

    pub fn close(&mut self) -> Result<(), DomainError> {
        self.move_to(ShopStatus::Closed)
    }

    fn move_to(&mut self, target: ShopStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(name: &str) -> ShopDetails {
        ShopDetails {
            name: name.to_string(),
            description: Some("  Fresh bread  ".to_string()),
            category: ShopCategory::Grocery,
            address: "1 Main St".to_string(),
            location: GeoPoint::new(52.52, 13.405).unwrap(),
            phone: None,
        }
    }

    #[test]
    fn register_starts_pending_and_not_accepting_cards() {
        let shop = Shop::register(UserId::new(), details("Bakery")).unwrap();
        assert_eq!(shop.status(), ShopStatus::Pending);
        assert!(!shop.is_accepting_cards());
        assert_eq!(shop.description(), Some("Fresh bread"));
    }

    #[test]
    fn register_rejects_blank_name_and_address() {
        assert!(Shop::register(UserId::new(), details("   ")).is_err());
        let mut d = details("Ok");
        d.address = " ".to_string();
        assert!(Shop::register(UserId::new(), d).is_err());
    }

    #[test]
    fn register_rejects_overlong_name() {
        let err = Shop::register(UserId::new(), details(&"n".repeat(121))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn full_lifecycle() {
        let mut shop = Shop::register(UserId::new(), details("Bakery")).unwrap();
        shop.approve().unwrap();
        assert!(shop.is_accepting_cards());
        shop.suspend().unwrap();
        assert!(!shop.is_accepting_cards());
        shop.reinstate().unwrap();
        assert!(shop.is_accepting_cards());
        shop.close().unwrap();
        assert_eq!(shop.status(), ShopStatus::Closed);
        assert!(shop.approve().is_err());
        assert!(shop.update_details(details("Again")).is_err());
    }

    #[test]
    fn reinstate_requires_suspension() {
        let mut shop = Shop::register(UserId::new(), details("Bakery")).unwrap();
        assert!(shop.reinstate().is_err());
        shop.approve().unwrap();
        assert!(shop.reinstate().is_err());
    }

    #[test]
    fn pending_shop_cannot_be_suspended() {
        let mut shop = Shop::register(UserId::new(), details("Bakery")).unwrap();
        assert_eq!(
            shop.suspend().unwrap_err().code,
            ErrorCode::InvalidStateTransition
        );
    }

    #[test]
    fn only_owner_or_admin_can_manage() {
        let owner = UserId::new();
        let shop = Shop::register(owner, details("Bakery")).unwrap();
        assert!(shop.authorize_manage(&owner, false).is_ok());
        assert!(shop.authorize_manage(&UserId::new(), true).is_ok());
        assert_eq!(
            shop.authorize_manage(&UserId::new(), false).unwrap_err().code,
            ErrorCode::Forbidden
        );
    }
}
