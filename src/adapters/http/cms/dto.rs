//! HTTP DTOs for banners, blog posts and FAQs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adapters::http::dto::{rfc3339, PageParams};
use crate::domain::cms::{
    Banner, BannerContent, BannerPlacement, BlogContent, BlogPost, BlogStatus, Faq, FaqContent,
};
use crate::domain::foundation::Timestamp;

fn default_true() -> bool {
    true
}

// ── Banners ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct BannerRequest {
    pub title: String,
    pub image_url: String,
    #[serde(default)]
    pub link_url: Option<String>,
    pub placement: BannerPlacement,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
}

impl From<BannerRequest> for BannerContent {
    fn from(req: BannerRequest) -> Self {
        Self {
            title: req.title,
            image_url: req.image_url,
            link_url: req.link_url,
            placement: req.placement,
            sort_order: req.sort_order,
            active: req.active,
            starts_at: req.starts_at.map(Timestamp::from_datetime),
            ends_at: req.ends_at.map(Timestamp::from_datetime),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct BannerParams {
    #[serde(default)]
    pub placement: Option<BannerPlacement>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BannerResponse {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub placement: BannerPlacement,
    pub sort_order: i32,
    pub active: bool,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Banner> for BannerResponse {
    fn from(banner: &Banner) -> Self {
        let c = banner.content();
        Self {
            id: banner.id().to_string(),
            title: c.title.clone(),
            image_url: c.image_url.clone(),
            link_url: c.link_url.clone(),
            placement: c.placement,
            sort_order: c.sort_order,
            active: c.active,
            starts_at: c.starts_at.as_ref().map(rfc3339),
            ends_at: c.ends_at.as_ref().map(rfc3339),
            created_at: rfc3339(banner.created_at()),
            updated_at: rfc3339(banner.updated_at()),
        }
    }
}

// ── Blog posts ───────────────────────────────────────────────────────────

/// Body for creating or editing a post. A missing slug is derived from
/// the title.
#[derive(Debug, Clone, Deserialize)]
pub struct BlogPostRequest {
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub body: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

impl BlogPostRequest {
    pub fn into_parts(self) -> (BlogContent, Option<String>) {
        let content = BlogContent {
            title: self.title,
            summary: self.summary,
            body: self.body,
            cover_image_url: self.cover_image_url,
        };
        (content, self.slug)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct BlogListParams {
    /// Admin listing only.
    #[serde(default)]
    pub status: Option<BlogStatus>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl BlogListParams {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogPostResponse {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub body: String,
    pub cover_image_url: Option<String>,
    pub status: BlogStatus,
    pub author_id: String,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&BlogPost> for BlogPostResponse {
    fn from(post: &BlogPost) -> Self {
        let c = post.content();
        Self {
            id: post.id().to_string(),
            slug: post.slug().to_string(),
            title: c.title.clone(),
            summary: c.summary.clone(),
            body: c.body.clone(),
            cover_image_url: c.cover_image_url.clone(),
            status: post.status(),
            author_id: post.author_id().to_string(),
            published_at: post.published_at().map(rfc3339),
            created_at: rfc3339(post.created_at()),
            updated_at: rfc3339(post.updated_at()),
        }
    }
}

impl From<BlogPost> for BlogPostResponse {
    fn from(post: BlogPost) -> Self {
        Self::from(&post)
    }
}

// ── FAQs ─────────────────────────────────────────────────────────────────

fn default_faq_category() -> String {
    "general".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaqRequest {
    pub question: String,
    pub answer: String,
    #[serde(default = "default_faq_category")]
    pub category: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl From<FaqRequest> for FaqContent {
    fn from(req: FaqRequest) -> Self {
        Self {
            question: req.question,
            answer: req.answer,
            category: req.category,
            sort_order: req.sort_order,
            active: req.active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FaqResponse {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub sort_order: i32,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Faq> for FaqResponse {
    fn from(faq: &Faq) -> Self {
        let c = faq.content();
        Self {
            id: faq.id().to_string(),
            question: c.question.clone(),
            answer: c.answer.clone(),
            category: c.category.clone(),
            sort_order: c.sort_order,
            active: c.active,
            created_at: rfc3339(faq.created_at()),
            updated_at: rfc3339(faq.updated_at()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_defaults_to_active() {
        let req: BannerRequest = serde_json::from_value(serde_json::json!({
            "title": "Spring sale",
            "image_url": "https://cdn.example.com/spring.png",
            "placement": "home",
        }))
        .unwrap();
        let content = BannerContent::from(req);
        assert!(content.active);
        assert_eq!(content.sort_order, 0);
        assert!(content.starts_at.is_none());
    }

    #[test]
    fn faq_category_defaults_to_general() {
        let req: FaqRequest = serde_json::from_value(serde_json::json!({
            "question": "How do I get a card?",
            "answer": "Ask at the front desk.",
        }))
        .unwrap();
        assert_eq!(FaqContent::from(req).category, "general");
    }

    #[test]
    fn blog_request_splits_slug_from_content() {
        let req: BlogPostRequest = serde_json::from_value(serde_json::json!({
            "title": "Hello",
            "body": "World",
            "slug": "hello-world",
        }))
        .unwrap();
        let (content, slug) = req.into_parts();
        assert_eq!(content.title, "Hello");
        assert_eq!(slug.as_deref(), Some("hello-world"));
    }
}
