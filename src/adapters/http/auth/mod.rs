//! HTTP adapter for phone + OTP authentication.
//!
//! - `POST /api/auth/otp/request` - Start a login or phone change
//! - `POST /api/auth/otp/:id/resend` - Resend with a fresh code
//! - `POST /api/auth/otp/verify` - Verify and receive a bearer token
//! - `GET /api/auth/me` - Current user

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::auth_routes;
