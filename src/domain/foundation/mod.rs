//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the discount card domain.

mod auth;
mod date_range;
mod email;
mod errors;
mod geo;
mod ids;
mod money;
mod pagination;
mod percentage;
mod phone;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, Role};
pub use date_range::{DateRange, MAX_SPAN_DAYS};
pub use email::Email;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use geo::GeoPoint;
pub use ids::{
    BannerId, BlogPostId, DiscountRuleId, FaqId, OtpSessionId, ShopId, TransactionId, UserId,
};
pub use money::Money;
pub use pagination::{Page, PageRequest, DEFAULT_PER_PAGE, MAX_PER_PAGE};
pub use percentage::Percentage;
pub use phone::PhoneNumber;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
