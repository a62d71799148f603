//! Blog posts and their publishing workflow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::validate_url;
use crate::domain::foundation::{
    BlogPostId, DomainError, StateMachine, Timestamp, UserId, ValidationError,
};

pub const MAX_SLUG_LENGTH: usize = 80;
pub const MAX_BLOG_TITLE_LENGTH: usize = 200;
pub const MAX_SUMMARY_LENGTH: usize = 500;

/// Turns free text into a URL slug.
///
/// Lower-case ASCII letters and digits are kept; every run of anything else
/// becomes a single `-`. Leading and trailing dashes are dropped and the
/// result is cut to 80 characters.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.len() > MAX_SLUG_LENGTH {
        slug.truncate(MAX_SLUG_LENGTH);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlogStatus {
    Draft,
    Published,
    Archived,
}

impl BlogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Draft => "draft",
            BlogStatus::Published => "published",
            BlogStatus::Archived => "archived",
        }
    }
}

impl StateMachine for BlogStatus {
    const SUBJECT: &'static str = "blog post";

    fn valid_transitions(&self) -> &'static [Self] {
        use BlogStatus::*;
        match self {
            Draft => &[Published],
            Published => &[Draft, Archived],
            Archived => &[Draft],
        }
    }
}

impl fmt::Display for BlogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlogStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(BlogStatus::Draft),
            "published" => Ok(BlogStatus::Published),
            "archived" => Ok(BlogStatus::Archived),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown blog status '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogContent {
    pub title: String,
    pub summary: Option<String>,
    pub body: String,
    pub cover_image_url: Option<String>,
}

impl BlogContent {
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        let len = self.title.chars().count();
        if len > MAX_BLOG_TITLE_LENGTH {
            return Err(ValidationError::out_of_range(
                "title",
                1,
                MAX_BLOG_TITLE_LENGTH as i64,
                len as i64,
            ));
        }
        if self.body.trim().is_empty() {
            return Err(ValidationError::empty_field("body"));
        }
        self.summary = self
            .summary
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if let Some(s) = &self.summary {
            let len = s.chars().count();
            if len > MAX_SUMMARY_LENGTH {
                return Err(ValidationError::out_of_range(
                    "summary",
                    0,
                    MAX_SUMMARY_LENGTH as i64,
                    len as i64,
                ));
            }
        }
        self.cover_image_url = match self.cover_image_url.as_deref().map(str::trim) {
            Some(u) if !u.is_empty() => Some(validate_url("cover_image_url", u)?),
            _ => None,
        };
        Ok(self)
    }
}

/// # Invariants
///
/// - `slug` is non-empty, at most 80 characters, unique (repository enforced)
/// - `published_at` is set on first publish and never cleared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    id: BlogPostId,
    slug: String,
    content: BlogContent,
    author_id: UserId,
    status: BlogStatus,
    published_at: Option<Timestamp>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl BlogPost {
    /// Creates a draft. The slug comes from `slug` if given, else the title.
    pub fn create(
        content: BlogContent,
        slug: Option<&str>,
        author_id: UserId,
    ) -> Result<Self, DomainError> {
        let content = content.validated()?;
        let slug = Self::make_slug(slug.unwrap_or(&content.title))?;
        let now = Timestamp::now();
        Ok(Self {
            id: BlogPostId::new(),
            slug,
            content,
            author_id,
            status: BlogStatus::Draft,
            published_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: BlogPostId,
        slug: String,
        content: BlogContent,
        author_id: UserId,
        status: BlogStatus,
        published_at: Option<Timestamp>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            slug,
            content,
            author_id,
            status,
            published_at,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &BlogPostId {
        &self.id
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn content(&self) -> &BlogContent {
        &self.content
    }

    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    pub fn status(&self) -> BlogStatus {
        self.status
    }

    pub fn is_published(&self) -> bool {
        self.status == BlogStatus::Published
    }

    pub fn published_at(&self) -> Option<&Timestamp> {
        self.published_at.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn update(&mut self, content: BlogContent, slug: Option<&str>) -> Result<(), DomainError> {
        let content = content.validated()?;
        if let Some(raw) = slug {
            self.slug = Self::make_slug(raw)?;
        }
        self.content = content;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn publish(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.move_to(BlogStatus::Published)?;
        if self.published_at.is_none() {
            self.published_at = Some(now);
        }
        Ok(())
    }

    pub fn unpublish(&mut self) -> Result<(), DomainError> {
        self.move_to(BlogStatus::Draft)
    }

    pub fn archive(&mut self) -> Result<(), DomainError> {
        self.move_to(BlogStatus::Archived)
    }

    fn move_to(&mut self, target: BlogStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    fn make_slug(raw: &str) -> Result<String, ValidationError> {
        let slug = slugify(raw);
        if slug.is_empty() {
            return Err(ValidationError::invalid_format(
                "slug",
                "must contain at least one letter or digit",
            ));
        }
        Ok(slug)
    }
}
