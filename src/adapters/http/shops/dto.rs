//! HTTP DTOs for shop endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::dto::{rfc3339, PageParams};
use crate::adapters::http::error::ApiError;
use crate::domain::foundation::{GeoPoint, PhoneNumber};
use crate::domain::shop::{Shop, ShopCategory, ShopDetails, ShopHit, ShopStatus};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body for POST /shops and PATCH /shops/:id.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: ShopCategory,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub phone: Option<String>,
    /// Admin only: register the shop for another merchant.
    #[serde(default)]
    pub owner_id: Option<String>,
}

impl ShopRequest {
    pub fn to_details(&self) -> Result<ShopDetails, ApiError> {
        let phone = self
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PhoneNumber::parse)
            .transpose()?;
        Ok(ShopDetails {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category,
            address: self.address.clone(),
            location: GeoPoint::new(self.latitude, self.longitude)?,
            phone,
        })
    }
}

/// GET /shops query string.
///
/// `lat`, `lng` and `radius_km` enable the near-me search and must be
/// given together. `status` is honoured for admins and for owners listing
/// their own shops (`mine=true`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchShopsParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<ShopCategory>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub status: Option<ShopStatus>,
    #[serde(default)]
    pub mine: bool,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl SearchShopsParams {
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
pub struct ShopResponse {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: ShopCategory,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub status: ShopStatus,
    pub accepting_cards: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Shop> for ShopResponse {
    fn from(shop: &Shop) -> Self {
        Self {
            id: shop.id().to_string(),
            owner_id: shop.owner_id().to_string(),
            name: shop.name().to_string(),
            description: shop.description().map(str::to_string),
            category: shop.category(),
            address: shop.address().to_string(),
            latitude: shop.location().lat(),
            longitude: shop.location().lng(),
            phone: shop.phone().map(|p| p.as_str().to_string()),
            status: shop.status(),
            accepting_cards: shop.is_accepting_cards(),
            distance_km: None,
            created_at: rfc3339(shop.created_at()),
            updated_at: rfc3339(shop.updated_at()),
        }
    }
}

impl From<Shop> for ShopResponse {
    fn from(shop: Shop) -> Self {
        Self::from(&shop)
    }
}

impl From<ShopHit> for ShopResponse {
    fn from(hit: ShopHit) -> Self {
        Self {
            // Rounded to 10 m.
            distance_km: hit.distance_km.map(|d| (d * 100.0).round() / 100.0),
            ..Self::from(&hit.shop)
        }
    }
}
