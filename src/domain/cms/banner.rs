//! Promotional banners shown in the apps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::validate_url;
use crate::domain::foundation::{BannerId, DomainError, Timestamp, ValidationError};

pub const MAX_TITLE_LENGTH: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerPlacement {
    Home,
    Search,
    Shop,
}

impl BannerPlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            BannerPlacement::Home => "home",
            BannerPlacement::Search => "search",
            BannerPlacement::Shop => "shop",
        }
    }
}

impl fmt::Display for BannerPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BannerPlacement {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(BannerPlacement::Home),
            "search" => Ok(BannerPlacement::Search),
            "shop" => Ok(BannerPlacement::Shop),
            other => Err(ValidationError::invalid_format(
                "placement",
                format!("unknown placement '{}'", other),
            )),
        }
    }
}

/// Editable banner fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerContent {
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub placement: BannerPlacement,
    pub sort_order: i32,
    pub active: bool,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
}

impl BannerContent {
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        let len = self.title.chars().count();
        if len > MAX_TITLE_LENGTH {
            return Err(ValidationError::out_of_range(
                "title",
                1,
                MAX_TITLE_LENGTH as i64,
                len as i64,
            ));
        }
        self.image_url = validate_url("image_url", &self.image_url)?;
        self.link_url = match self.link_url.as_deref().map(str::trim) {
            Some(u) if !u.is_empty() => Some(validate_url("link_url", u)?),
            _ => None,
        };
        if let (Some(start), Some(end)) = (self.starts_at, self.ends_at) {
            if !start.is_before(&end) {
                return Err(ValidationError::invalid_format("ends_at", "must be after starts_at"));
            }
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    id: BannerId,
    content: BannerContent,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Banner {
    pub fn create(content: BannerContent) -> Result<Self, DomainError> {
        let now = Timestamp::now();
        Ok(Self {
            id: BannerId::new(),
            content: content.validated()?,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn reconstitute(
        id: BannerId,
        content: BannerContent,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            content,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &BannerId {
        &self.id
    }

    pub fn content(&self) -> &BannerContent {
        &self.content
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn update(&mut self, content: BannerContent) -> Result<(), DomainError> {
        self.content = content.validated()?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Active and inside its optional `[starts_at, ends_at)` window.
    pub fn is_visible(&self, now: &Timestamp) -> bool {
        let c = &self.content;
        c.active && now.is_within(c.starts_at.as_ref(), c.ends_at.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> BannerContent {
        BannerContent {
            title: " Summer sale ".into(),
            image_url: "https://cdn.example.com/b.png".into(),
            link_url: Some("  ".into()),
            placement: BannerPlacement::Home,
            sort_order: 0,
            active: true,
            starts_at: None,
            ends_at: None,
        }
    }

    #[test]
    fn create_normalizes_fields() {
        let b = Banner::create(content()).unwrap();
        assert_eq!(b.content().title, "Summer sale");
        assert_eq!(b.content().link_url, None);
    }

    #[test]
    fn rejects_non_http_image() {
        let mut c = content();
        c.image_url = "ftp://x/y.png".into();
        assert!(Banner::create(c).is_err());
    }

    #[test]
    fn visibility_respects_window_and_flag() {
        let now = Timestamp::now();
        let mut c = content();
        c.starts_at = Some(now.plus_secs(10));
        c.ends_at = Some(now.plus_secs(20));
        let mut b = Banner::create(c.clone()).unwrap();
        assert!(!b.is_visible(&now));
        assert!(b.is_visible(&now.plus_secs(10)));
        assert!(!b.is_visible(&now.plus_secs(20)));

        c.active = false;
        b.update(c).unwrap();
        assert!(!b.is_visible(&now.plus_secs(15)));
    }

    #[test]
    fn rejects_inverted_window() {
        let now = Timestamp::now();
        let mut c = content();
        c.starts_at = Some(now);
        c.ends_at = Some(now);
        assert!(Banner::create(c).is_err());
    }
}
