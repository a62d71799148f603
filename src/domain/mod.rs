//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, money, phone numbers, errors)
//! - `user` - Users and their discount cards
//! - `shop` - Partner shops, lifecycle and search
//! - `discount` - Discount rules and purchase matching
//! - `transaction` - Card purchases
//! - `otp` - One-time code sessions
//! - `cms` - Banners, blog posts, FAQs
//! - `analytics` - Reporting read models and aggregations

pub mod analytics;
pub mod cms;
pub mod discount;
pub mod foundation;
pub mod otp;
pub mod shop;
pub mod transaction;
pub mod user;
