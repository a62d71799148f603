//! HTTP routes for CMS content.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    active_faqs, all_banners, all_faqs, all_posts, archive_post, create_banner, create_faq,
    create_post, delete_banner, delete_faq, delete_post, get_post, publish_post, published_post,
    published_posts, unpublish_post, update_banner, update_faq, update_post, visible_banners,
};
use crate::adapters::http::state::AppState;

/// Mounted at `/api/cms`.
///
/// `/blogs/:key` is a slug for GET and a post id for PUT and DELETE; the
/// router requires one parameter name per segment.
pub fn cms_routes() -> Router<AppState> {
    Router::new()
        .route("/banners", get(visible_banners).post(create_banner))
        .route("/banners/:id", put(update_banner).delete(delete_banner))
        .route("/blogs", get(published_posts).post(create_post))
        .route(
            "/blogs/:key",
            get(published_post).put(update_post).delete(delete_post),
        )
        .route("/blogs/:key/publish", post(publish_post))
        .route("/blogs/:key/unpublish", post(unpublish_post))
        .route("/blogs/:key/archive", post(archive_post))
        .route("/faqs", get(active_faqs).post(create_faq))
        .route("/faqs/:id", put(update_faq).delete(delete_faq))
        .route("/admin/banners", get(all_banners))
        .route("/admin/blogs", get(all_posts))
        .route("/admin/blogs/:id", get(get_post))
        .route("/admin/faqs", get(all_faqs))
}
