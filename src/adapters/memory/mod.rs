//! In-memory adapters.
//!
//! Every repository port backed by `tokio::sync::RwLock<HashMap>`, plus an
//! analytics reader that runs the pure aggregations in `domain::analytics`
//! over the same maps. Used by tests and by local runs without a database.
//!
//! Each type is `Clone`; clones share storage.

mod analytics;
mod cms;
mod discount_rules;
mod otp_sessions;
mod shops;
mod transactions;
mod users;

pub use analytics::InMemoryAnalyticsReader;
pub use cms::{InMemoryBannerRepository, InMemoryBlogPostRepository, InMemoryFaqRepository};
pub use discount_rules::InMemoryDiscountRuleRepository;
pub use otp_sessions::InMemoryOtpSessionRepository;
pub use shops::InMemoryShopRepository;
pub use transactions::InMemoryTransactionRepository;
pub use users::InMemoryUserRepository;
