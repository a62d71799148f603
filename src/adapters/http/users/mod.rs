//! HTTP adapter for users and their discount cards.
//!
//! - `GET /api/users` - Admin list with role/status/text filters
//! - `GET /api/users/:id` - Self or admin
//! - `PATCH /api/users/me` - Update own profile
//! - `GET /api/users/me/card` - Own card
//! - `POST /api/users/:id/{role,suspend,reactivate}` - Admin
//! - `POST /api/users/:id/card[/block|/unblock|/tier|/renew]` - Admin

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::user_routes;
