//! HTTP DTOs for user and card endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::dto::{rfc3339, PageParams};
use crate::domain::foundation::Role;
use crate::domain::user::{CardStatus, CardTier, DiscountCard, User, UserStatus};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// PATCH /users/me. Absent fields are cleared.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueCardRequest {
    #[serde(default)]
    pub tier: Option<CardTier>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeTierRequest {
    pub tier: CardTier,
}

/// GET /users query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersParams {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub status: Option<UserStatus>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl ListUsersParams {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct CardResponse {
    pub number: String,
    pub masked_number: String,
    pub tier: CardTier,
    pub status: CardStatus,
    pub issued_at: String,
    pub expires_at: String,
}

impl From<&DiscountCard> for CardResponse {
    fn from(card: &DiscountCard) -> Self {
        Self {
            number: card.number().as_str().to_string(),
            masked_number: card.number().masked(),
            tier: card.tier(),
            status: card.status(),
            issued_at: rfc3339(card.issued_at()),
            expires_at: rfc3339(card.expires_at()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub card: Option<CardResponse>,
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            phone: user.phone().as_str().to_string(),
            name: user.name().map(str::to_string),
            email: user.email().map(|e| e.as_str().to_string()),
            role: user.role(),
            status: user.status(),
            card: user.card().map(CardResponse::from),
            created_at: rfc3339(user.created_at()),
            updated_at: rfc3339(user.updated_at()),
            last_login_at: user.last_login_at().map(rfc3339),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}
