//! Adapters - Implementations of port interfaces.
//!
//! - `auth` - JWT token issuing and validation, plus test doubles
//! - `http` - axum REST API
//! - `memory` - In-memory repositories for tests and local runs
//! - `postgres` - sqlx repositories and the analytics reader
//! - `sms` - OTP delivery

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod sms;
