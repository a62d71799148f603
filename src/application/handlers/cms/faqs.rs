//! FAQ handlers.

use std::sync::Arc;

use crate::application::handlers::access::require_admin;
use crate::domain::cms::{Faq, FaqContent};
use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, FaqId};
use crate::ports::FaqRepository;

pub struct FaqHandler {
    faqs: Arc<dyn FaqRepository>,
}

impl FaqHandler {
    pub fn new(faqs: Arc<dyn FaqRepository>) -> Self {
        Self { faqs }
    }

    pub async fn active(&self) -> Result<Vec<Faq>, DomainError> {
        self.faqs.list(false).await
    }

    pub async fn list_all(&self, actor: &AuthenticatedUser) -> Result<Vec<Faq>, DomainError> {
        require_admin(actor)?;
        self.faqs.list(true).await
    }

    pub async fn create(&self, actor: &AuthenticatedUser, content: FaqContent) -> Result<Faq, DomainError> {
        require_admin(actor)?;
        let faq = Faq::create(content)?;
        self.faqs.save(&faq).await?;
        Ok(faq)
    }

    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: &FaqId,
        content: FaqContent,
    ) -> Result<Faq, DomainError> {
        require_admin(actor)?;
        let mut faq = self
            .faqs
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::FaqNotFound, "FAQ", id))?;
        faq.update(content)?;
        self.faqs.update(&faq).await?;
        Ok(faq)
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: &FaqId) -> Result<(), DomainError> {
        require_admin(actor)?;
        self.faqs.delete(id).await
    }
}
