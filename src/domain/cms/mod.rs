//! CMS module: banners, blog posts and FAQ entries.

mod banner;
mod blog;
mod faq;

pub use banner::{Banner, BannerContent, BannerPlacement};
pub use blog::{slugify, BlogContent, BlogPost, BlogStatus, MAX_SLUG_LENGTH};
pub use faq::{Faq, FaqContent};

use crate::domain::foundation::ValidationError;

const MAX_URL_LENGTH: usize = 2048;

/// Accepts absolute `http`/`https` URLs only. Images are referenced, never
/// uploaded.
pub(crate) fn validate_url(field: &str, raw: &str) -> Result<String, ValidationError> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    if url.len() > MAX_URL_LENGTH {
        return Err(ValidationError::invalid_format(field, "URL too long"));
    }
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| ValidationError::invalid_format(field, "must be an http(s) URL"))?;
    if rest.is_empty() || rest.starts_with('/') || url.chars().any(char::is_whitespace) {
        return Err(ValidationError::invalid_format(field, "must include a host"));
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_validation() {
        assert!(validate_url("u", "https://example.com/a.png").is_ok());
        assert!(validate_url("u", "http://x").is_ok());
        assert!(validate_url("u", "https://").is_err());
        assert!(validate_url("u", "javascript:alert(1)").is_err());
        assert!(validate_url("u", "https://a b").is_err());
    }
}
