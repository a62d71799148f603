//! User aggregate.
//!
//! Users log in with a phone number and an OTP; there are no passwords.
//! Each user may hold one discount card.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::card::{CardNumber, CardTier, DiscountCard};
use crate::domain::foundation::{
    DomainError, Email, ErrorCode, PhoneNumber, Role, Timestamp, UserId, ValidationError,
};

/// Maximum length for a display name.
pub const MAX_NAME_LENGTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
        }
    }
}

impl FromStr for UserStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "suspended" => Ok(UserStatus::Suspended),
            other => Err(ValidationError::invalid_format(
                "user_status",
                format!("unknown user status '{}'", other),
            )),
        }
    }
}

/// A platform user.
///
/// # Invariants
///
/// - `phone` is unique across users (enforced by the repository)
/// - `name`, when present, is trimmed and 1-100 characters
/// - Suspended users cannot log in
/// - `version` is the stored revision this copy was loaded at; the
///   repository rejects updates from a stale copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    phone: PhoneNumber,
    name: Option<String>,
    email: Option<Email>,
    role: Role,
    status: UserStatus,
    card: Option<DiscountCard>,
    created_at: Timestamp,
    updated_at: Timestamp,
    last_login_at: Option<Timestamp>,
    version: u32,
}

impl User {
    /// Registers a new active user without a card.
    pub fn register(phone: PhoneNumber, role: Role) -> Self {
        let now = Timestamp::now();
        Self {
            id: UserId::new(),
            phone,
            name: None,
            email: None,
            role,
            status: UserStatus::Active,
            card: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
            version: 0,
        }
    }

    /// Reconstitute a user from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: UserId,
        phone: PhoneNumber,
        name: Option<String>,
        email: Option<Email>,
        role: Role,
        status: UserStatus,
        card: Option<DiscountCard>,
        created_at: Timestamp,
        updated_at: Timestamp,
        last_login_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            phone,
            name,
            email,
            role,
            status,
            card,
            created_at,
            updated_at,
            last_login_at,
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

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    pub fn card(&self) -> Option<&DiscountCard> {
        self.card.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn last_login_at(&self) -> Option<&Timestamp> {
        self.last_login_at.as_ref()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Replaces the profile fields. A blank name clears it.
    pub fn update_profile(
        &mut self,
        name: Option<String>,
        email: Option<Email>,
    ) -> Result<(), DomainError> {
        self.name = Self::normalize_name(name)?;
        self.email = email;
        self.touch();
        Ok(())
    }

    pub fn change_role(&mut self, role: Role) {
        self.role = role;
        self.touch();
    }

    pub fn suspend(&mut self) -> Result<(), DomainError> {
        if self.status == UserStatus::Suspended {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "User is already suspended",
            ));
        }
        self.status = UserStatus::Suspended;
        self.touch();
        Ok(())
    }

    pub fn reactivate(&mut self) -> Result<(), DomainError> {
        if self.status == UserStatus::Active {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "User is not suspended",
            ));
        }
        self.status = UserStatus::Active;
        self.touch();
        Ok(())
    }

    pub fn change_phone(&mut self, phone: PhoneNumber) {
        self.phone = phone;
        self.touch();
    }

    /// Records a successful login.
    ///
    /// # Errors
    ///
    /// - `AccountSuspended` if the user is suspended
    pub fn record_login(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.ensure_can_login()?;
        self.last_login_at = Some(now);
        Ok(())
    }

    pub fn ensure_can_login(&self) -> Result<(), DomainError> {
        if self.status == UserStatus::Suspended {
            return Err(DomainError::new(
                ErrorCode::AccountSuspended,
                "Account is suspended",
            ));
        }
        Ok(())
    }

    /// Issues the user's card.
    ///
    /// # Errors
    ///
    /// - `CardAlreadyIssued` if the user already holds one
    pub fn issue_card(
        &mut self,
        number: CardNumber,
        tier: CardTier,
        validity_days: u32,
        now: Timestamp,
    ) -> Result<&DiscountCard, DomainError> {
        if self.card.is_some() {
            return Err(DomainError::new(
                ErrorCode::CardAlreadyIssued,
                "User already has a discount card",
            ));
        }
        let card = DiscountCard::issue(number, tier, validity_days, now)?;
        self.touch();
        Ok(self.card.insert(card))
    }

    /// Mutable access to the card for block/unblock/tier/renew.
    ///
    /// # Errors
    ///
    /// - `CardNotFound` if no card was issued
    pub fn card_mut(&mut self) -> Result<&mut DiscountCard, DomainError> {
        self.updated_at = Timestamp::now();
        let id = self.id;
        self.card
            .as_mut()
            .ok_or_else(|| DomainError::not_found(ErrorCode::CardNotFound, "Card", id))
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    fn normalize_name(name: Option<String>) -> Result<Option<String>, DomainError> {
        let Some(raw) = name else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let len = trimmed.chars().count();
        if len > MAX_NAME_LENGTH {
            return Err(ValidationError::out_of_range(
                "name",
                1,
                MAX_NAME_LENGTH as i64,
                len as i64,
            )
            .into());
        }
        Ok(Some(trimmed.to_string()))
    }
}
