//! HTTP adapter for discount rules and purchase quotes.
//!
//! Shop-scoped rules are listed and created under `/api/shops/:id/rules`;
//! everything that addresses a rule by its own id lives here.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{quote_routes, rule_routes};
