//! In-memory CMS repositories.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::cms::{Banner, BannerPlacement, BlogPost, BlogStatus, Faq};
use crate::domain::foundation::{
    BannerId, BlogPostId, DomainError, ErrorCode, FaqId, Page, PageRequest,
};
use crate::ports::{BannerRepository, BlogPostRepository, FaqRepository};

// ════════════════════════════════════════════════════════════════════════════
// Banners
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct InMemoryBannerRepository {
    banners: Arc<RwLock<HashMap<BannerId, Banner>>>,
}

impl InMemoryBannerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BannerRepository for InMemoryBannerRepository {
    async fn save(&self, banner: &Banner) -> Result<(), DomainError> {
        self.banners.write().await.insert(*banner.id(), banner.clone());
        Ok(())
    }

    async fn update(&self, banner: &Banner) -> Result<(), DomainError> {
        let mut banners = self.banners.write().await;
        let existing = banners.get_mut(banner.id()).ok_or_else(|| {
            DomainError::not_found(ErrorCode::BannerNotFound, "Banner", banner.id())
        })?;
        *existing = banner.clone();
        Ok(())
    }

    async fn delete(&self, id: &BannerId) -> Result<(), DomainError> {
        self.banners
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(ErrorCode::BannerNotFound, "Banner", id))
    }

    async fn find_by_id(&self, id: &BannerId) -> Result<Option<Banner>, DomainError> {
        Ok(self.banners.read().await.get(id).cloned())
    }

    async fn list(&self, placement: Option<BannerPlacement>) -> Result<Vec<Banner>, DomainError> {
        let mut banners: Vec<Banner> = self
            .banners
            .read()
            .await
            .values()
            .filter(|b| placement.map_or(true, |p| b.content().placement == p))
            .cloned()
            .collect();
        banners.sort_by(|a, b| {
            a.content()
                .sort_order
                .cmp(&b.content().sort_order)
                .then(a.created_at().cmp(b.created_at()))
        });
        Ok(banners)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Blog posts
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct InMemoryBlogPostRepository {
    posts: Arc<RwLock<HashMap<BlogPostId, BlogPost>>>,
}

impl InMemoryBlogPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_slug_free(
        posts: &HashMap<BlogPostId, BlogPost>,
        post: &BlogPost,
    ) -> Result<(), DomainError> {
        let taken = posts
            .values()
            .any(|p| p.id() != post.id() && p.slug() == post.slug());
        if taken {
            return Err(DomainError::new(
                ErrorCode::SlugTaken,
                format!("Slug '{}' is already in use", post.slug()),
            )
            .with_detail("slug", post.slug()));
        }
        Ok(())
    }
}

#[async_trait]
impl BlogPostRepository for InMemoryBlogPostRepository {
    async fn save(&self, post: &BlogPost) -> Result<(), DomainError> {
        let mut posts = self.posts.write().await;
        Self::ensure_slug_free(&posts, post)?;
        posts.insert(*post.id(), post.clone());
        Ok(())
    }

    async fn update(&self, post: &BlogPost) -> Result<(), DomainError> {
        let mut posts = self.posts.write().await;
        if !posts.contains_key(post.id()) {
            return Err(DomainError::not_found(
                ErrorCode::BlogPostNotFound,
                "Blog post",
                post.id(),
            ));
        }
        Self::ensure_slug_free(&posts, post)?;
        posts.insert(*post.id(), post.clone());
        Ok(())
    }

    async fn delete(&self, id: &BlogPostId) -> Result<(), DomainError> {
        self.posts
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(ErrorCode::BlogPostNotFound, "Blog post", id))
    }

    async fn find_by_id(&self, id: &BlogPostId) -> Result<Option<BlogPost>, DomainError> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, DomainError> {
        Ok(self
            .posts
            .read()
            .await
            .values()
            .find(|p| p.slug() == slug)
            .cloned())
    }

    async fn list(
        &self,
        status: Option<BlogStatus>,
        page: &PageRequest,
    ) -> Result<Page<BlogPost>, DomainError> {
        let mut posts: Vec<BlogPost> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| status.map_or(true, |s| p.status() == s))
            .cloned()
            .collect();
        if status == Some(BlogStatus::Published) {
            posts.sort_by(|a, b| b.published_at().cmp(&a.published_at()));
        } else {
            posts.sort_by(|a, b| b.updated_at().cmp(a.updated_at()));
        }
        Ok(page.paginate(posts))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FAQs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct InMemoryFaqRepository {
    faqs: Arc<RwLock<HashMap<FaqId, Faq>>>,
}

impl InMemoryFaqRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FaqRepository for InMemoryFaqRepository {
    async fn save(&self, faq: &Faq) -> Result<(), DomainError> {
        self.faqs.write().await.insert(*faq.id(), faq.clone());
        Ok(())
    }

    async fn update(&self, faq: &Faq) -> Result<(), DomainError> {
        let mut faqs = self.faqs.write().await;
        let existing = faqs
            .get_mut(faq.id())
            .ok_or_else(|| DomainError::not_found(ErrorCode::FaqNotFound, "FAQ", faq.id()))?;
        *existing = faq.clone();
        Ok(())
    }

    async fn delete(&self, id: &FaqId) -> Result<(), DomainError> {
        self.faqs
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(ErrorCode::FaqNotFound, "FAQ", id))
    }

    async fn find_by_id(&self, id: &FaqId) -> Result<Option<Faq>, DomainError> {
        Ok(self.faqs.read().await.get(id).cloned())
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<Faq>, DomainError> {
        let mut faqs: Vec<Faq> = self
            .faqs
            .read()
            .await
            .values()
            .filter(|f| include_inactive || f.content().active)
            .cloned()
            .collect();
        faqs.sort_by(|a, b| {
            a.content()
                .category
                .cmp(&b.content().category)
                .then(a.content().sort_order.cmp(&b.content().sort_order))
                .then(a.created_at().cmp(b.created_at()))
        });
        Ok(faqs)
    }
}
