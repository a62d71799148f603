//! HTTP adapter for banners, blog posts and FAQs.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::cms_routes;
