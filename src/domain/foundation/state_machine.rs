//! Lifecycle rules for status enums.
//!
//! Shops, transactions and blog posts each declare their allowed moves as a
//! static table; the trait turns an illegal move into an
//! `INVALID_STATE_TRANSITION` error carrying both states.

use std::fmt;

use super::{DomainError, ErrorCode};

/// A status enum whose transitions are fixed at compile time.
///
/// ```ignore
/// impl StateMachine for ShopStatus {
///     const SUBJECT: &'static str = "shop";
///
///     fn valid_transitions(&self) -> &'static [Self] {
///         match self {
///             Pending => &[Active, Closed],
///             Closed => &[],
///             // ...
///         }
///     }
/// }
///
/// shop.status = shop.status.transition_to(ShopStatus::Active)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + fmt::Display + 'static {
    /// Noun used in error messages ("shop", "transaction", ...).
    const SUBJECT: &'static str;

    /// States reachable in one step from `self`.
    fn valid_transitions(&self) -> &'static [Self];

    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Returns `target` when the move is allowed.
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            return Ok(target);
        }
        Err(DomainError::new(
            ErrorCode::InvalidStateTransition,
            format!("Cannot move {} from {} to {}", Self::SUBJECT, self, target),
        )
        .with_detail("from", self.to_string())
        .with_detail("to", target.to_string()))
    }

    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
