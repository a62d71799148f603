//! Shop lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Status of a partner shop.
///
/// ```text
/// Pending ──► Active ◄──► Suspended
///    │          │            │
///    └──────────┴─► Closed ◄─┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopStatus {
    Pending,
    Active,
    Suspended,
    Closed,
}

impl ShopStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShopStatus::Pending => "pending",
            ShopStatus::Active => "active",
            ShopStatus::Suspended => "suspended",
            ShopStatus::Closed => "closed",
        }
    }
}

impl StateMachine for ShopStatus {
    const SUBJECT: &'static str = "shop";

    fn valid_transitions(&self) -> &'static [Self] {
        use ShopStatus::*;
        match self {
            Pending => &[Active, Closed],
            Active => &[Suspended, Closed],
            Suspended => &[Active, Closed],
            Closed => &[],
        }
    }
}

impl fmt::Display for ShopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShopStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ShopStatus::Pending),
            "active" => Ok(ShopStatus::Active),
            "suspended" => Ok(ShopStatus::Suspended),
            "closed" => Ok(ShopStatus::Closed),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown shop status '{}'", other),
            )),
        }
    }
}
