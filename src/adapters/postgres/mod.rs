//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresUserRepository` - Users with their embedded discount card
//! - `PostgresShopRepository` - Partner shops and proximity search
//! - `PostgresDiscountRuleRepository` - Shop and platform-wide rules
//! - `PostgresTransactionRepository` - Card transactions
//! - `PostgresOtpSessionRepository` - OTP verification sessions
//! - `PostgresBannerRepository`, `PostgresBlogPostRepository`, `PostgresFaqRepository` - CMS
//! - `PostgresAnalyticsReader` - Dashboard aggregations
//!
//! Schema lives in `migrations/` and is applied with `sqlx::migrate!`.

mod analytics_reader;
mod cms_repository;
mod discount_rule_repository;
mod otp_session_repository;
mod shop_repository;
mod support;
mod transaction_repository;
mod user_repository;

pub use analytics_reader::PostgresAnalyticsReader;
pub use cms_repository::{PostgresBannerRepository, PostgresBlogPostRepository, PostgresFaqRepository};
pub use discount_rule_repository::PostgresDiscountRuleRepository;
pub use otp_session_repository::PostgresOtpSessionRepository;
pub use shop_repository::PostgresShopRepository;
pub use transaction_repository::PostgresTransactionRepository;
pub use user_repository::PostgresUserRepository;
