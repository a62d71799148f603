//! Whole-percent value object used by percentage discounts.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A whole percent in `0..=100`.
///
/// Discount rates are stored as whole percents; fractional rates are not
/// offered to shops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Percentage(u8);

impl Percentage {
    pub const ZERO: Self = Self(0);
    pub const HUNDRED: Self = Self(100);

    pub fn try_new(value: u8) -> Result<Self, ValidationError> {
        Self::from_field("percentage", i64::from(value))
    }

    /// Parses a raw integer coming from a named input field.
    pub fn from_field(field: &str, value: i64) -> Result<Self, ValidationError> {
        match u8::try_from(value) {
            Ok(v) if v <= 100 => Ok(Self(v)),
            _ => Err(ValidationError::out_of_range(field, 0, 100, value)),
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// `floor(cents * self / 100)`. The result never exceeds `cents`.
    pub fn floor_share_of(&self, cents: i64) -> i64 {
        let share = i128::from(cents) * i128::from(self.0) / 100;
        i64::try_from(share).unwrap_or(cents)
    }
}

impl TryFrom<i64> for Percentage {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_field("percentage", value)
    }
}

impl From<Percentage> for i64 {
    fn from(p: Percentage) -> Self {
        i64::from(p.0)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
