//! Shop search criteria.
//!
//! The same criteria drive both the SQL query and the in-memory filter, so
//! `matches` and `sort_results` are the reference semantics.

use std::cmp::Ordering;

use super::{Shop, ShopCategory, ShopStatus};
use crate::domain::foundation::{GeoPoint, PageRequest, UserId, ValidationError};

pub const MAX_RADIUS_KM: f64 = 500.0;

/// Geographic filter: shops within `radius_km` of `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearFilter {
    center: GeoPoint,
    radius_km: f64,
}

impl NearFilter {
    pub fn new(center: GeoPoint, radius_km: f64) -> Result<Self, ValidationError> {
        if !radius_km.is_finite() || radius_km <= 0.0 || radius_km > MAX_RADIUS_KM {
            return Err(ValidationError::invalid_format(
                "radius_km",
                format!("must be greater than 0 and at most {}", MAX_RADIUS_KM),
            ));
        }
        Ok(Self { center, radius_km })
    }

    pub fn center(&self) -> &GeoPoint {
        &self.center
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShopSearch {
    /// Case-insensitive substring over name, description and address.
    pub query: Option<String>,
    pub category: Option<ShopCategory>,
    pub near: Option<NearFilter>,
    /// `None` means any status.
    pub status: Option<ShopStatus>,
    pub owner_id: Option<UserId>,
    pub page: PageRequest,
}

impl Default for ShopSearch {
    fn default() -> Self {
        Self {
            query: None,
            category: None,
            near: None,
            status: Some(ShopStatus::Active),
            owner_id: None,
            page: PageRequest::default(),
        }
    }
}

/// A search hit; `distance_km` is set when searching near a point.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopHit {
    pub shop: Shop,
    pub distance_km: Option<f64>,
}

impl ShopSearch {
    /// Query text trimmed and lower-cased, `None` when blank.
    pub fn normalized_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    /// Evaluates every filter against one shop.
    pub fn matches(&self, shop: &Shop) -> Option<ShopHit> {
        if let Some(status) = self.status {
            if shop.status() != status {
                return None;
            }
        }
        if let Some(category) = self.category {
            if shop.category() != category {
                return None;
            }
        }
        if let Some(owner) = &self.owner_id {
            if shop.owner_id() != owner {
                return None;
            }
        }
        if let Some(q) = self.normalized_query() {
            let hit = shop.name().to_lowercase().contains(&q)
                || shop.address().to_lowercase().contains(&q)
                || shop
                    .description()
                    .map(|d| d.to_lowercase().contains(&q))
                    .unwrap_or(false);
            if !hit {
                return None;
            }
        }

        let distance_km = match &self.near {
            Some(near) => {
                let d = near.center.distance_km(shop.location());
                if d > near.radius_km {
                    return None;
                }
                Some(d)
            }
            None => None,
        };

        Some(ShopHit {
            shop: shop.clone(),
            distance_km,
        })
    }

    /// Nearest first when searching near a point, otherwise by name.
    pub fn sort_results(&self, hits: &mut [ShopHit]) {
        if self.near.is_some() {
            hits.sort_by(|a, b| {
                a.distance_km
                    .partial_cmp(&b.distance_km)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.shop.name().cmp(b.shop.name()))
            });
        } else {
            hits.sort_by(|a, b| {
                a.shop
                    .name()
                    .to_lowercase()
                    .cmp(&b.shop.name().to_lowercase())
                    .then_with(|| a.shop.id().cmp(b.shop.id()))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shop::ShopDetails;

    fn shop_at(name: &str, lat: f64, lng: f64, category: ShopCategory) -> Shop {
        let mut shop = Shop::register(
            UserId::new(),
            ShopDetails {
                name: name.to_string(),
                description: None,
                category,
                address: "Somewhere 1".to_string(),
                location: GeoPoint::new(lat, lng).unwrap(),
                phone: None,
            },
        )
        .unwrap();
        shop.approve().unwrap();
        shop
    }

    #[test]
    fn radius_must_be_positive_and_bounded() {
        let c = GeoPoint::new(0.0, 0.0).unwrap();
        assert!(NearFilter::new(c, 0.0).is_err());
        assert!(NearFilter::new(c, 500.1).is_err());
        assert!(NearFilter::new(c, 500.0).is_ok());
    }

    #[test]
    fn default_search_only_returns_active_shops() {
        let active = shop_at("A", 0.0, 0.0, ShopCategory::Cafe);
        let pending = Shop::register(
            UserId::new(),
            ShopDetails {
                name: "P".into(),
                description: None,
                category: ShopCategory::Cafe,
                address: "x".into(),
                location: GeoPoint::new(0.0, 0.0).unwrap(),
                phone: None,
            },
        )
        .unwrap();
        let search = ShopSearch::default();
        assert!(search.matches(&active).is_some());
        assert!(search.matches(&pending).is_none());
    }

    #[test]
    fn query_is_case_insensitive() {
        let shop = shop_at("Blue Bottle", 0.0, 0.0, ShopCategory::Cafe);
        let search = ShopSearch {
            query: Some("  bottle ".into()),
            ..Default::default()
        };
        assert!(search.matches(&shop).is_some());
    }

    #[test]
    fn near_filter_excludes_far_shops_and_sorts_by_distance() {
        let berlin = GeoPoint::new(52.52, 13.405).unwrap();
        let close = shop_at("Zeta", 52.53, 13.41, ShopCategory::Cafe);
        let closer = shop_at("Alpha", 52.5201, 13.4051, ShopCategory::Cafe);
        let far = shop_at("Paris", 48.8566, 2.3522, ShopCategory::Cafe);

        let search = ShopSearch {
            near: Some(NearFilter::new(berlin, 10.0).unwrap()),
            ..Default::default()
        };
        let mut hits: Vec<ShopHit> = [&close, &closer, &far]
            .iter()
            .filter_map(|s| search.matches(s))
            .collect();
        search.sort_results(&mut hits);

        let names: Vec<&str> = hits.iter().map(|h| h.shop.name()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
        assert!(hits[0].distance_km.unwrap() < hits[1].distance_km.unwrap());
    }

    #[test]
    fn without_near_results_sort_by_name() {
        let search = ShopSearch::default();
        let mut hits: Vec<ShopHit> = [
            shop_at("cafe b", 0.0, 0.0, ShopCategory::Cafe),
            shop_at("Cafe A", 0.0, 0.0, ShopCategory::Cafe),
        ]
        .iter()
        .filter_map(|s| search.matches(s))
        .collect();
        search.sort_results(&mut hits);
        assert_eq!(hits[0].shop.name(), "Cafe A");
    }

    #[test]
    fn category_filter_applies() {
        let shop = shop_at("Gym", 0.0, 0.0, ShopCategory::Health);
        let search = ShopSearch {
            category: Some(ShopCategory::Cafe),
            ..Default::default()
        };
        assert!(search.matches(&shop).is_none());
    }
}
