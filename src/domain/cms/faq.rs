use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, FaqId, Timestamp, ValidationError};

pub const MAX_QUESTION_LENGTH: usize = 500;
pub const MAX_CATEGORY_LENGTH: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqContent {
    pub question: String,
    pub answer: String,
    pub category: String,
    pub sort_order: i32,
    pub active: bool,
}

impl FaqContent {
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.question = self.question.trim().to_string();
        if self.question.is_empty() {
            return Err(ValidationError::empty_field("question"));
        }
        let len = self.question.chars().count();
        if len > MAX_QUESTION_LENGTH {
            return Err(ValidationError::out_of_range(
                "question",
                1,
                MAX_QUESTION_LENGTH as i64,
                len as i64,
            ));
        }
        self.answer = self.answer.trim().to_string();
        if self.answer.is_empty() {
            return Err(ValidationError::empty_field("answer"));
        }
        self.category = self.category.trim().to_lowercase();
        if self.category.is_empty() {
            self.category = "general".to_string();
        }
        if self.category.chars().count() > MAX_CATEGORY_LENGTH {
            return Err(ValidationError::out_of_range(
                "category",
                1,
                MAX_CATEGORY_LENGTH as i64,
                self.category.chars().count() as i64,
            ));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    id: FaqId,
    content: FaqContent,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Faq {
    pub fn create(content: FaqContent) -> Result<Self, DomainError> {
        let now = Timestamp::now();
        Ok(Self {
            id: FaqId::new(),
            content: content.validated()?,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn reconstitute(
        id: FaqId,
        content: FaqContent,
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

    pub fn id(&self) -> &FaqId {
        &self.id
    }

    pub fn content(&self) -> &FaqContent {
        &self.content
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn update(&mut self, content: FaqContent) -> Result<(), DomainError> {
        self.content = content.validated()?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
