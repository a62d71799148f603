//! Banner handlers.

use std::sync::Arc;

use crate::application::handlers::access::require_admin;
use crate::domain::cms::{Banner, BannerContent, BannerPlacement};
use crate::domain::foundation::{AuthenticatedUser, BannerId, DomainError, ErrorCode, Timestamp};
use crate::ports::BannerRepository;

pub struct BannerHandler {
    banners: Arc<dyn BannerRepository>,
}

impl BannerHandler {
    pub fn new(banners: Arc<dyn BannerRepository>) -> Self {
        Self { banners }
    }

    /// Banners visible right now, by sort order.
    pub async fn visible(&self, placement: Option<BannerPlacement>) -> Result<Vec<Banner>, DomainError> {
        let now = Timestamp::now();
        let mut banners = self.banners.list(placement).await?;
        banners.retain(|b| b.is_visible(&now));
        Ok(banners)
    }

    /// Every banner including inactive and scheduled ones.
    pub async fn list_all(
        &self,
        actor: &AuthenticatedUser,
        placement: Option<BannerPlacement>,
    ) -> Result<Vec<Banner>, DomainError> {
        require_admin(actor)?;
        self.banners.list(placement).await
    }

    pub async fn create(&self, actor: &AuthenticatedUser, content: BannerContent) -> Result<Banner, DomainError> {
        require_admin(actor)?;
        let banner = Banner::create(content)?;
        self.banners.save(&banner).await?;
        Ok(banner)
    }

    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: &BannerId,
        content: BannerContent,
    ) -> Result<Banner, DomainError> {
        require_admin(actor)?;
        let mut banner = self
            .banners
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::BannerNotFound, "Banner", id))?;
        banner.update(content)?;
        self.banners.update(&banner).await?;
        Ok(banner)
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: &BannerId) -> Result<(), DomainError> {
        require_admin(actor)?;
        self.banners.delete(id).await
    }
}
