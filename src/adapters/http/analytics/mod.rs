//! HTTP adapter for admin and shop-owner reports.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::analytics_routes;
