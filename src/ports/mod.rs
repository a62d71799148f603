//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Repository Ports
//!
//! - `UserRepository`, `ShopRepository`, `DiscountRuleRepository`,
//!   `TransactionRepository`, `OtpSessionRepository`
//! - `BannerRepository`, `BlogPostRepository`, `FaqRepository`
//!
//! ## Read Ports
//!
//! - `AnalyticsReader` - Dashboard aggregations
//!
//! ## Auth and Delivery Ports
//!
//! - `SessionValidator` / `TokenIssuer` - Access token validation and minting
//! - `OtpSender` - SMS delivery of one-time codes

mod analytics_reader;
mod cms_repository;
mod discount_rule_repository;
mod otp_sender;
mod otp_session_repository;
mod session_validator;
mod shop_repository;
mod token_issuer;
mod transaction_repository;
mod user_repository;

pub use analytics_reader::AnalyticsReader;
pub use cms_repository::{BannerRepository, BlogPostRepository, FaqRepository};
pub use discount_rule_repository::DiscountRuleRepository;
pub use otp_sender::OtpSender;
pub use otp_session_repository::OtpSessionRepository;
pub use session_validator::SessionValidator;
pub use shop_repository::ShopRepository;
pub use token_issuer::{IssuedToken, TokenIssuer};
pub use transaction_repository::TransactionRepository;
pub use user_repository::{UserFilter, UserRepository};
