//! CMS repository ports: banners, blog posts and FAQs.

use async_trait::async_trait;

use crate::domain::cms::{Banner, BannerPlacement, BlogPost, BlogStatus, Faq};
use crate::domain::foundation::{BannerId, BlogPostId, DomainError, FaqId, Page, PageRequest};

#[async_trait]
pub trait BannerRepository: Send + Sync {
    async fn save(&self, banner: &Banner) -> Result<(), DomainError>;

    async fn update(&self, banner: &Banner) -> Result<(), DomainError>;

    async fn delete(&self, id: &BannerId) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &BannerId) -> Result<Option<Banner>, DomainError>;

    /// All banners, optionally for one placement, by sort_order then
    /// created_at. Visibility is filtered by the caller.
    async fn list(&self, placement: Option<BannerPlacement>) -> Result<Vec<Banner>, DomainError>;
}

#[async_trait]
pub trait BlogPostRepository: Send + Sync {
    /// # Errors
    ///
    /// - `SlugTaken` if another post already uses the slug
    async fn save(&self, post: &BlogPost) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `BlogPostNotFound` if the post doesn't exist
    /// - `SlugTaken` if another post already uses the slug
    async fn update(&self, post: &BlogPost) -> Result<(), DomainError>;

    async fn delete(&self, id: &BlogPostId) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &BlogPostId) -> Result<Option<BlogPost>, DomainError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, DomainError>;

    /// Posts in a status (any when `None`). Published posts are ordered by
    /// published_at desc, everything else by updated_at desc.
    async fn list(
        &self,
        status: Option<BlogStatus>,
        page: &PageRequest,
    ) -> Result<Page<BlogPost>, DomainError>;
}

#[async_trait]
pub trait FaqRepository: Send + Sync {
    async fn save(&self, faq: &Faq) -> Result<(), DomainError>;

    async fn update(&self, faq: &Faq) -> Result<(), DomainError>;

    async fn delete(&self, id: &FaqId) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &FaqId) -> Result<Option<Faq>, DomainError>;

    /// FAQs ordered by category, then sort_order.
    async fn list(&self, include_inactive: bool) -> Result<Vec<Faq>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cms_repositories_are_object_safe() {
        fn _banner(_repo: &dyn BannerRepository) {}
        fn _blog(_repo: &dyn BlogPostRepository) {}
        fn _faq(_repo: &dyn FaqRepository) {}
    }
}
