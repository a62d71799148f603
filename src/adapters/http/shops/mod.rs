//! HTTP adapter for the partner shop directory.
//!
//! - `GET /api/shops` - Text, category and near-me search
//! - `GET /api/shops/:id` - One shop
//! - `POST /api/shops` - Register (merchant or admin)
//! - `PATCH /api/shops/:id` - Edit details
//! - `POST /api/shops/:id/{approve,suspend,reinstate,close}` - Lifecycle
//! - `GET|POST /api/shops/:id/rules` - Shop discount rules

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::shop_routes;
