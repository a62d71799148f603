//! HTTP adapter for card transactions.
//!
//! - `POST /api/transactions` - Record a purchase (shop owner or admin)
//! - `GET /api/transactions` - All (admin)
//! - `GET /api/transactions/mine` - Caller's purchases
//! - `GET /api/transactions/shop/:shop_id` - A shop's sales
//! - `GET /api/transactions/:id`
//! - `POST /api/transactions/:id/{complete,cancel,refund}`

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::transaction_routes;
