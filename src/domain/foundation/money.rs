//! Money value object in integer minor units.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Percentage, ValidationError};

/// A non-negative amount of money in cents.
///
/// All arithmetic is integral; percentage discounts round down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    /// Creates an amount from cents, rejecting negative values.
    pub fn from_cents(cents: i64) -> Result<Self, ValidationError> {
        if cents < 0 {
            return Err(ValidationError::out_of_range("amount_cents", 0, i64::MAX, cents));
        }
        Ok(Self(cents))
    }

    /// Creates an amount from cents for a named field, so errors point at it.
    pub fn from_cents_field(field: &str, cents: i64) -> Result<Self, ValidationError> {
        Self::from_cents(cents).map_err(|_| ValidationError::out_of_range(field, 0, i64::MAX, cents))
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtraction that stops at zero.
    pub fn saturating_sub(self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }

    pub fn min(self, other: Money) -> Money {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// `floor(self * pct / 100)`.
    pub fn percent(self, pct: Percentage) -> Money {
        Money(pct.floor_share_of(self.0))
    }
}

impl TryFrom<i64> for Money {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_cents(value)
    }
}

impl From<Money> for i64 {
    fn from(m: Money) -> Self {
        m.0
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        Money(iter.map(|m| m.0).fold(0i64, i64::saturating_add))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
