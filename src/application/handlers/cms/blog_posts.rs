//! Blog post handlers: admin authoring and the public blog.

use std::sync::Arc;

use crate::application::handlers::access::require_admin;
use crate::domain::cms::{BlogContent, BlogPost, BlogStatus};
use crate::domain::foundation::{
    AuthenticatedUser, BlogPostId, DomainError, ErrorCode, Page, PageRequest, Timestamp,
};
use crate::ports::BlogPostRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogAction {
    Publish,
    Unpublish,
    Archive,
}

pub struct BlogPostHandler {
    posts: Arc<dyn BlogPostRepository>,
}

impl BlogPostHandler {
    pub fn new(posts: Arc<dyn BlogPostRepository>) -> Self {
        Self { posts }
    }

    /// Published posts, newest first.
    pub async fn published(&self, page: PageRequest) -> Result<Page<BlogPost>, DomainError> {
        self.posts.list(Some(BlogStatus::Published), &page).await
    }

    /// A published post by slug. Drafts and archived posts are not found.
    pub async fn published_by_slug(&self, slug: &str) -> Result<BlogPost, DomainError> {
        self.posts
            .find_by_slug(slug)
            .await?
            .filter(BlogPost::is_published)
            .ok_or_else(|| DomainError::not_found(ErrorCode::BlogPostNotFound, "Blog post", slug))
    }

    pub async fn list_all(
        &self,
        actor: &AuthenticatedUser,
        status: Option<BlogStatus>,
        page: PageRequest,
    ) -> Result<Page<BlogPost>, DomainError> {
        require_admin(actor)?;
        self.posts.list(status, &page).await
    }

    pub async fn get(&self, actor: &AuthenticatedUser, id: &BlogPostId) -> Result<BlogPost, DomainError> {
        require_admin(actor)?;
        self.load(id).await
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        content: BlogContent,
        slug: Option<String>,
    ) -> Result<BlogPost, DomainError> {
        require_admin(actor)?;
        let post = BlogPost::create(content, slug.as_deref(), actor.id)?;
        self.ensure_slug_free(&post).await?;
        self.posts.save(&post).await?;

        tracing::info!(post_id = %post.id(), slug = post.slug(), "Blog post created");
        Ok(post)
    }

    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: &BlogPostId,
        content: BlogContent,
        slug: Option<String>,
    ) -> Result<BlogPost, DomainError> {
        require_admin(actor)?;
        let mut post = self.load(id).await?;
        post.update(content, slug.as_deref())?;
        self.ensure_slug_free(&post).await?;
        self.posts.update(&post).await?;
        Ok(post)
    }

    pub async fn change_status(
        &self,
        actor: &AuthenticatedUser,
        id: &BlogPostId,
        action: BlogAction,
    ) -> Result<BlogPost, DomainError> {
        require_admin(actor)?;
        let mut post = self.load(id).await?;
        match action {
            BlogAction::Publish => post.publish(Timestamp::now())?,
            BlogAction::Unpublish => post.unpublish()?,
            BlogAction::Archive => post.archive()?,
        }
        self.posts.update(&post).await?;

        tracing::info!(post_id = %post.id(), status = post.status().as_str(), "Blog post status changed");
        Ok(post)
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: &BlogPostId) -> Result<(), DomainError> {
        require_admin(actor)?;
        self.posts.delete(id).await
    }

    // The repository enforces uniqueness too; checking first gives a clean
    // error without relying on a constraint name.
    async fn ensure_slug_free(&self, post: &BlogPost) -> Result<(), DomainError> {
        match self.posts.find_by_slug(post.slug()).await? {
            Some(existing) if existing.id() != post.id() => Err(DomainError::new(
                ErrorCode::SlugTaken,
                "Another post already uses this slug",
            )
            .with_detail("slug", post.slug())),
            _ => Ok(()),
        }
    }

    async fn load(&self, id: &BlogPostId) -> Result<BlogPost, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::BlogPostNotFound, "Blog post", id))
    }
}
