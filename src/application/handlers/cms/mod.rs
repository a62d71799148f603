//! CMS handlers. Writes are admin only; reads of visible content are public.

mod banners;
mod blog_posts;
mod faqs;

pub use banners::BannerHandler;
pub use blog_posts::{BlogAction, BlogPostHandler};
pub use faqs::FaqHandler;
