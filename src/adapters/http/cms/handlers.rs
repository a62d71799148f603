//! HTTP handlers for CMS content.
//!
//! Reads under `/cms/*` are public and only return live content. The
//! `/cms/admin/*` listings and every write require an admin.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::dto::PageResponse;
use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::RequireAdmin;
use crate::adapters::http::state::AppState;
use crate::application::handlers::cms::BlogAction;
use crate::domain::foundation::{BannerId, BlogPostId, FaqId};

use super::dto::{
    BannerParams, BannerRequest, BannerResponse, BlogListParams, BlogPostRequest,
    BlogPostResponse, FaqRequest, FaqResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Banners
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/cms/banners - Banners visible right now
pub async fn visible_banners(
    State(state): State<AppState>,
    Query(params): Query<BannerParams>,
) -> Result<Json<Vec<BannerResponse>>, ApiError> {
    let banners = state.banner_handler().visible(params.placement).await?;
    Ok(Json(banners.iter().map(BannerResponse::from).collect()))
}

/// GET /api/cms/admin/banners
pub async fn all_banners(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Query(params): Query<BannerParams>,
) -> Result<Json<Vec<BannerResponse>>, ApiError> {
    let banners = state
        .banner_handler()
        .list_all(&actor, params.placement)
        .await?;
    Ok(Json(banners.iter().map(BannerResponse::from).collect()))
}

/// POST /api/cms/banners
pub async fn create_banner(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Json(req): Json<BannerRequest>,
) -> Result<(StatusCode, Json<BannerResponse>), ApiError> {
    let banner = state.banner_handler().create(&actor, req.into()).await?;
    Ok((StatusCode::CREATED, Json(BannerResponse::from(&banner))))
}

/// PUT /api/cms/banners/:id
pub async fn update_banner(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
    Json(req): Json<BannerRequest>,
) -> Result<Json<BannerResponse>, ApiError> {
    let id: BannerId = parse_id("banner_id", &id)?;
    let banner = state
        .banner_handler()
        .update(&actor, &id, req.into())
        .await?;
    Ok(Json(BannerResponse::from(&banner)))
}

/// DELETE /api/cms/banners/:id
pub async fn delete_banner(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: BannerId = parse_id("banner_id", &id)?;
    state.banner_handler().delete(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════
// Blog posts
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/cms/blogs - Published posts, newest first
pub async fn published_posts(
    State(state): State<AppState>,
    Query(params): Query<BlogListParams>,
) -> Result<Json<PageResponse<BlogPostResponse>>, ApiError> {
    let page = state
        .blog_post_handler()
        .published(params.page_params().to_request()?)
        .await?;
    Ok(Json(PageResponse::from_page(page, BlogPostResponse::from)))
}

/// GET /api/cms/blogs/:slug
pub async fn published_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPostResponse>, ApiError> {
    let post = state.blog_post_handler().published_by_slug(&slug).await?;
    Ok(Json(post.into()))
}

/// GET /api/cms/admin/blogs - Every post, optionally by status
pub async fn all_posts(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Query(params): Query<BlogListParams>,
) -> Result<Json<PageResponse<BlogPostResponse>>, ApiError> {
    let page = state
        .blog_post_handler()
        .list_all(&actor, params.status, params.page_params().to_request()?)
        .await?;
    Ok(Json(PageResponse::from_page(page, BlogPostResponse::from)))
}

/// GET /api/cms/admin/blogs/:id - Any post by id, drafts included
pub async fn get_post(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<BlogPostResponse>, ApiError> {
    let id: BlogPostId = parse_id("post_id", &id)?;
    let post = state.blog_post_handler().get(&actor, &id).await?;
    Ok(Json(post.into()))
}

/// POST /api/cms/blogs - Create a draft
pub async fn create_post(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Json(req): Json<BlogPostRequest>,
) -> Result<(StatusCode, Json<BlogPostResponse>), ApiError> {
    let (content, slug) = req.into_parts();
    let post = state
        .blog_post_handler()
        .create(&actor, content, slug)
        .await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

/// PUT /api/cms/blogs/:id
pub async fn update_post(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
    Json(req): Json<BlogPostRequest>,
) -> Result<Json<BlogPostResponse>, ApiError> {
    let id: BlogPostId = parse_id("post_id", &id)?;
    let (content, slug) = req.into_parts();
    let post = state
        .blog_post_handler()
        .update(&actor, &id, content, slug)
        .await?;
    Ok(Json(post.into()))
}

/// DELETE /api/cms/blogs/:id
pub async fn delete_post(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: BlogPostId = parse_id("post_id", &id)?;
    state.blog_post_handler().delete(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/cms/blogs/:id/publish
pub async fn publish_post(
    state: State<AppState>,
    actor: RequireAdmin,
    id: Path<String>,
) -> Result<Json<BlogPostResponse>, ApiError> {
    change_post_status(state, actor, id, BlogAction::Publish).await
}

/// POST /api/cms/blogs/:id/unpublish
pub async fn unpublish_post(
    state: State<AppState>,
    actor: RequireAdmin,
    id: Path<String>,
) -> Result<Json<BlogPostResponse>, ApiError> {
    change_post_status(state, actor, id, BlogAction::Unpublish).await
}

/// POST /api/cms/blogs/:id/archive
pub async fn archive_post(
    state: State<AppState>,
    actor: RequireAdmin,
    id: Path<String>,
) -> Result<Json<BlogPostResponse>, ApiError> {
    change_post_status(state, actor, id, BlogAction::Archive).await
}

async fn change_post_status(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
    action: BlogAction,
) -> Result<Json<BlogPostResponse>, ApiError> {
    let id: BlogPostId = parse_id("post_id", &id)?;
    let post = state
        .blog_post_handler()
        .change_status(&actor, &id, action)
        .await?;
    Ok(Json(post.into()))
}

// ════════════════════════════════════════════════════════════════════════════
// FAQs
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/cms/faqs - Active FAQs in display order
pub async fn active_faqs(
    State(state): State<AppState>,
) -> Result<Json<Vec<FaqResponse>>, ApiError> {
    let faqs = state.faq_handler().active().await?;
    Ok(Json(faqs.iter().map(FaqResponse::from).collect()))
}

/// GET /api/cms/admin/faqs
pub async fn all_faqs(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
) -> Result<Json<Vec<FaqResponse>>, ApiError> {
    let faqs = state.faq_handler().list_all(&actor).await?;
    Ok(Json(faqs.iter().map(FaqResponse::from).collect()))
}

/// POST /api/cms/faqs
pub async fn create_faq(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Json(req): Json<FaqRequest>,
) -> Result<(StatusCode, Json<FaqResponse>), ApiError> {
    let faq = state.faq_handler().create(&actor, req.into()).await?;
    Ok((StatusCode::CREATED, Json(FaqResponse::from(&faq))))
}

/// PUT /api/cms/faqs/:id
pub async fn update_faq(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
    Json(req): Json<FaqRequest>,
) -> Result<Json<FaqResponse>, ApiError> {
    let id: FaqId = parse_id("faq_id", &id)?;
    let faq = state.faq_handler().update(&actor, &id, req.into()).await?;
    Ok(Json(FaqResponse::from(&faq)))
}

/// DELETE /api/cms/faqs/:id
pub async fn delete_faq(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: FaqId = parse_id("faq_id", &id)?;
    state.faq_handler().delete(&actor, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
