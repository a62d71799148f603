//! HTTP adapter - the REST API.
//!
//! Each endpoint group follows the same layout: `dto.rs` for wire types,
//! `handlers.rs` for axum handlers and `routes.rs` for the router. Handlers
//! build application handlers from the shared [`AppState`] per request and
//! map `DomainError` to a status code through [`ApiError`].

pub mod analytics;
pub mod auth;
pub mod cms;
pub mod discounts;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod router;
pub mod shops;
pub mod state;
pub mod transactions;
pub mod users;

pub use error::{ApiError, ErrorResponse};
pub use router::api_router;
pub use state::AppState;
