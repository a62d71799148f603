use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// What kind of business a shop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopCategory {
    Restaurant,
    Cafe,
    Grocery,
    Fashion,
    Electronics,
    Health,
    Beauty,
    Entertainment,
    Services,
    Other,
}

impl ShopCategory {
    pub const ALL: [ShopCategory; 10] = [
        ShopCategory::Restaurant,
        ShopCategory::Cafe,
        ShopCategory::Grocery,
        ShopCategory::Fashion,
        ShopCategory::Electronics,
        ShopCategory::Health,
        ShopCategory::Beauty,
        ShopCategory::Entertainment,
        ShopCategory::Services,
        ShopCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShopCategory::Restaurant => "restaurant",
            ShopCategory::Cafe => "cafe",
            ShopCategory::Grocery => "grocery",
            ShopCategory::Fashion => "fashion",
            ShopCategory::Electronics => "electronics",
            ShopCategory::Health => "health",
            ShopCategory::Beauty => "beauty",
            ShopCategory::Entertainment => "entertainment",
            ShopCategory::Services => "services",
            ShopCategory::Other => "other",
        }
    }
}

impl fmt::Display for ShopCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShopCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("category", format!("unknown category '{}'", s))
            })
    }
}
