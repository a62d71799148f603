//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations. Each
//! handler takes its ports as `Arc<dyn Port>` and checks the caller's role
//! before touching an aggregate.

pub(crate) mod access;

pub mod analytics;
pub mod cms;
pub mod discount;
pub mod otp;
pub mod shop;
pub mod transaction;
pub mod user;
