//! Discount Card - a multi-tenant discount card platform.
//!
//! Customers log in with a phone number and a one-time code, carry a
//! tiered discount card and present it at partner shops. Shop owners
//! publish discount rules; the best applicable rule is applied when a
//! purchase is recorded. Admins manage users, shops, CMS content and
//! reports.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
