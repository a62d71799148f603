//! PostgreSQL implementations of the CMS repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::support::{count, db_error, opt_dt, opt_ts, parse_column, ts, violates};
use crate::domain::cms::{
    Banner, BannerContent, BannerPlacement, BlogContent, BlogPost, BlogStatus, Faq, FaqContent,
};
use crate::domain::foundation::{
    BannerId, BlogPostId, DomainError, ErrorCode, FaqId, Page, PageRequest, UserId,
};
use crate::ports::{BannerRepository, BlogPostRepository, FaqRepository};

// ════════════════════════════════════════════════════════════════════════════
// Banners
// ════════════════════════════════════════════════════════════════════════════

pub struct PostgresBannerRepository {
    pool: PgPool,
}

impl PostgresBannerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BannerRow {
    id: Uuid,
    title: String,
    image_url: String,
    link_url: Option<String>,
    placement: String,
    sort_order: i32,
    active: bool,
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BannerRow> for Banner {
    type Error = DomainError;

    fn try_from(row: BannerRow) -> Result<Self, Self::Error> {
        let content = BannerContent {
            title: row.title,
            image_url: row.image_url,
            link_url: row.link_url,
            placement: parse_column("placement", &row.placement)?,
            sort_order: row.sort_order,
            active: row.active,
            starts_at: opt_ts(row.starts_at),
            ends_at: opt_ts(row.ends_at),
        };
        Ok(Banner::reconstitute(
            BannerId::from_uuid(row.id),
            content,
            ts(row.created_at),
            ts(row.updated_at),
        ))
    }
}

const BANNER_COLUMNS: &str = "id, title, image_url, link_url, placement, sort_order, active, \
     starts_at, ends_at, created_at, updated_at";

#[async_trait]
impl BannerRepository for PostgresBannerRepository {
    async fn save(&self, banner: &Banner) -> Result<(), DomainError> {
        let c = banner.content();
        sqlx::query(
            r#"
            INSERT INTO banners (
                id, title, image_url, link_url, placement, sort_order, active, starts_at,
                ends_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(banner.id().as_uuid())
        .bind(&c.title)
        .bind(&c.image_url)
        .bind(c.link_url.as_deref())
        .bind(c.placement.as_str())
        .bind(c.sort_order)
        .bind(c.active)
        .bind(opt_dt(c.starts_at.as_ref()))
        .bind(opt_dt(c.ends_at.as_ref()))
        .bind(banner.created_at().as_datetime())
        .bind(banner.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save banner", e))?;

        Ok(())
    }

    async fn update(&self, banner: &Banner) -> Result<(), DomainError> {
        let c = banner.content();
        let result = sqlx::query(
            r#"
            UPDATE banners SET
                title = $2,
                image_url = $3,
                link_url = $4,
                placement = $5,
                sort_order = $6,
                active = $7,
                starts_at = $8,
                ends_at = $9,
                updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(banner.id().as_uuid())
        .bind(&c.title)
        .bind(&c.image_url)
        .bind(c.link_url.as_deref())
        .bind(c.placement.as_str())
        .bind(c.sort_order)
        .bind(c.active)
        .bind(opt_dt(c.starts_at.as_ref()))
        .bind(opt_dt(c.ends_at.as_ref()))
        .bind(banner.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update banner", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ErrorCode::BannerNotFound, "Banner", banner.id()));
        }
        Ok(())
    }

    async fn delete(&self, id: &BannerId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM banners WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete banner", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ErrorCode::BannerNotFound, "Banner", id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &BannerId) -> Result<Option<Banner>, DomainError> {
        let sql = format!("SELECT {} FROM banners WHERE id = $1", BANNER_COLUMNS);
        let row: Option<BannerRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find banner", e))?;

        row.map(Banner::try_from).transpose()
    }

    async fn list(&self, placement: Option<BannerPlacement>) -> Result<Vec<Banner>, DomainError> {
        let sql = format!(
            "SELECT {} FROM banners WHERE ($1::TEXT IS NULL OR placement = $1) \
             ORDER BY sort_order, created_at",
            BANNER_COLUMNS
        );
        let rows: Vec<BannerRow> = sqlx::query_as(&sql)
            .bind(placement.map(|p| p.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list banners", e))?;

        rows.into_iter().map(Banner::try_from).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Blog posts
// ════════════════════════════════════════════════════════════════════════════

pub struct PostgresBlogPostRepository {
    pool: PgPool,
}

impl PostgresBlogPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_write_error(context: &str, slug: &str, err: sqlx::Error) -> DomainError {
        if violates(&err, "blog_posts_slug_key") {
            return DomainError::new(ErrorCode::SlugTaken, "Slug is already in use")
                .with_detail("slug", slug);
        }
        db_error(context, err)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BlogPostRow {
    id: Uuid,
    slug: String,
    title: String,
    summary: Option<String>,
    body: String,
    cover_image_url: Option<String>,
    author_id: Uuid,
    status: String,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BlogPostRow> for BlogPost {
    type Error = DomainError;

    fn try_from(row: BlogPostRow) -> Result<Self, Self::Error> {
        let content = BlogContent {
            title: row.title,
            summary: row.summary,
            body: row.body,
            cover_image_url: row.cover_image_url,
        };
        Ok(BlogPost::reconstitute(
            BlogPostId::from_uuid(row.id),
            row.slug,
            content,
            UserId::from_uuid(row.author_id),
            parse_column("status", &row.status)?,
            opt_ts(row.published_at),
            ts(row.created_at),
            ts(row.updated_at),
        ))
    }
}

const BLOG_COLUMNS: &str = "id, slug, title, summary, body, cover_image_url, author_id, status, \
     published_at, created_at, updated_at";

impl PostgresBlogPostRepository {
    async fn find_where(&self, column: &str, bind: Bind<'_>) -> Result<Option<BlogPost>, DomainError> {
        let sql = format!("SELECT {} FROM blog_posts WHERE {} = $1", BLOG_COLUMNS, column);
        let query = sqlx::query_as::<_, BlogPostRow>(&sql);
        let query = match bind {
            Bind::Id(id) => query.bind(id),
            Bind::Slug(slug) => query.bind(slug),
        };
        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find blog post", e))?;

        row.map(BlogPost::try_from).transpose()
    }
}

enum Bind<'a> {
    Id(Uuid),
    Slug(&'a str),
}

#[async_trait]
impl BlogPostRepository for PostgresBlogPostRepository {
    async fn save(&self, post: &BlogPost) -> Result<(), DomainError> {
        let c = post.content();
        sqlx::query(
            r#"
            INSERT INTO blog_posts (
                id, slug, title, summary, body, cover_image_url, author_id, status,
                published_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(post.id().as_uuid())
        .bind(post.slug())
        .bind(&c.title)
        .bind(c.summary.as_deref())
        .bind(&c.body)
        .bind(c.cover_image_url.as_deref())
        .bind(post.author_id().as_uuid())
        .bind(post.status().as_str())
        .bind(opt_dt(post.published_at()))
        .bind(post.created_at().as_datetime())
        .bind(post.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error("Failed to save blog post", post.slug(), e))?;

        Ok(())
    }

    async fn update(&self, post: &BlogPost) -> Result<(), DomainError> {
        let c = post.content();
        let result = sqlx::query(
            r#"
            UPDATE blog_posts SET
                slug = $2,
                title = $3,
                summary = $4,
                body = $5,
                cover_image_url = $6,
                status = $7,
                published_at = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(post.id().as_uuid())
        .bind(post.slug())
        .bind(&c.title)
        .bind(c.summary.as_deref())
        .bind(&c.body)
        .bind(c.cover_image_url.as_deref())
        .bind(post.status().as_str())
        .bind(opt_dt(post.published_at()))
        .bind(post.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error("Failed to update blog post", post.slug(), e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(
                ErrorCode::BlogPostNotFound,
                "Blog post",
                post.id(),
            ));
        }
        Ok(())
    }

    async fn delete(&self, id: &BlogPostId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete blog post", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ErrorCode::BlogPostNotFound, "Blog post", id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &BlogPostId) -> Result<Option<BlogPost>, DomainError> {
        self.find_where("id", Bind::Id(*id.as_uuid())).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, DomainError> {
        self.find_where("slug", Bind::Slug(slug)).await
    }

    async fn list(
        &self,
        status: Option<BlogStatus>,
        page: &PageRequest,
    ) -> Result<Page<BlogPost>, DomainError> {
        let status = status.map(|s| s.as_str());
        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM blog_posts WHERE ($1::TEXT IS NULL OR status = $1)")
                .bind(status)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("Failed to count blog posts", e))?;

        let order = if status == Some(BlogStatus::Published.as_str()) {
            "published_at DESC NULLS LAST, id"
        } else {
            "updated_at DESC, id"
        };
        let sql = format!(
            "SELECT {} FROM blog_posts WHERE ($1::TEXT IS NULL OR status = $1) \
             ORDER BY {} LIMIT $2 OFFSET $3",
            BLOG_COLUMNS, order
        );
        let rows: Vec<BlogPostRow> = sqlx::query_as(&sql)
            .bind(status)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list blog posts", e))?;

        let items = rows
            .into_iter()
            .map(BlogPost::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, count(total), *page))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FAQs
// ════════════════════════════════════════════════════════════════════════════

pub struct PostgresFaqRepository {
    pool: PgPool,
}

impl PostgresFaqRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FaqRow {
    id: Uuid,
    question: String,
    answer: String,
    category: String,
    sort_order: i32,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FaqRow> for Faq {
    fn from(row: FaqRow) -> Self {
        let content = FaqContent {
            question: row.question,
            answer: row.answer,
            category: row.category,
            sort_order: row.sort_order,
            active: row.active,
        };
        Faq::reconstitute(
            FaqId::from_uuid(row.id),
            content,
            ts(row.created_at),
            ts(row.updated_at),
        )
    }
}

const FAQ_COLUMNS: &str =
    "id, question, answer, category, sort_order, active, created_at, updated_at";

#[async_trait]
impl FaqRepository for PostgresFaqRepository {
    async fn save(&self, faq: &Faq) -> Result<(), DomainError> {
        let c = faq.content();
        sqlx::query(
            r#"
            INSERT INTO faqs (
                id, question, answer, category, sort_order, active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(faq.id().as_uuid())
        .bind(&c.question)
        .bind(&c.answer)
        .bind(&c.category)
        .bind(c.sort_order)
        .bind(c.active)
        .bind(faq.created_at().as_datetime())
        .bind(faq.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save FAQ", e))?;

        Ok(())
    }

    async fn update(&self, faq: &Faq) -> Result<(), DomainError> {
        let c = faq.content();
        let result = sqlx::query(
            r#"
            UPDATE faqs SET
                question = $2,
                answer = $3,
                category = $4,
                sort_order = $5,
                active = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(faq.id().as_uuid())
        .bind(&c.question)
        .bind(&c.answer)
        .bind(&c.category)
        .bind(c.sort_order)
        .bind(c.active)
        .bind(faq.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update FAQ", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ErrorCode::FaqNotFound, "FAQ", faq.id()));
        }
        Ok(())
    }

    async fn delete(&self, id: &FaqId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM faqs WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete FAQ", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ErrorCode::FaqNotFound, "FAQ", id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &FaqId) -> Result<Option<Faq>, DomainError> {
        let sql = format!("SELECT {} FROM faqs WHERE id = $1", FAQ_COLUMNS);
        let row: Option<FaqRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find FAQ", e))?;

        Ok(row.map(Faq::from))
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<Faq>, DomainError> {
        let sql = format!(
            "SELECT {} FROM faqs WHERE ($1 OR active) ORDER BY category, sort_order, created_at",
            FAQ_COLUMNS
        );
        let rows: Vec<FaqRow> = sqlx::query_as(&sql)
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list FAQs", e))?;

        Ok(rows.into_iter().map(Faq::from).collect())
    }
}
