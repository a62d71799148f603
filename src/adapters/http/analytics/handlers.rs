//! HTTP handlers for analytics reports.
//!
//! Every report takes an optional `from`/`to` date pair and defaults to
//! the last 30 days.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::{RequireAdmin, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::domain::foundation::ShopId;

use super::dto::{
    CategoryResponse, DailyResponse, OverviewResponse, ReportParams, ShopPerformanceResponse,
    ShopReportResponse, DEFAULT_TOP_SHOPS,
};

/// GET /api/analytics/overview
pub async fn overview(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Query(params): Query<ReportParams>,
) -> Result<Json<OverviewResponse>, ApiError> {
    let range = params.range_params().to_range()?;
    let overview = state.analytics_handler().overview(&actor, range).await?;
    Ok(Json(overview.into()))
}

/// GET /api/analytics/daily
pub async fn daily(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Query(params): Query<ReportParams>,
) -> Result<Json<Vec<DailyResponse>>, ApiError> {
    let range = params.range_params().to_range()?;
    let days = state.analytics_handler().daily(&actor, range).await?;
    Ok(Json(days.iter().map(DailyResponse::from).collect()))
}

/// GET /api/analytics/top-shops?limit=
pub async fn top_shops(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Query(params): Query<ReportParams>,
) -> Result<Json<Vec<ShopPerformanceResponse>>, ApiError> {
    let range = params.range_params().to_range()?;
    let limit = params.limit.unwrap_or(DEFAULT_TOP_SHOPS);
    let shops = state
        .analytics_handler()
        .top_shops(&actor, range, limit)
        .await?;
    Ok(Json(shops.iter().map(ShopPerformanceResponse::from).collect()))
}

/// GET /api/analytics/categories
pub async fn categories(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Query(params): Query<ReportParams>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let range = params.range_params().to_range()?;
    let stats = state.analytics_handler().categories(&actor, range).await?;
    Ok(Json(stats.iter().map(CategoryResponse::from).collect()))
}

/// GET /api/analytics/shops/:id - One shop's report (owner or admin)
pub async fn shop_report(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    Query(params): Query<ReportParams>,
) -> Result<Json<ShopReportResponse>, ApiError> {
    let shop_id: ShopId = parse_id("shop_id", &id)?;
    let range = params.range_params().to_range()?;
    let report = state
        .analytics_handler()
        .shop_report(&actor, &shop_id, range)
        .await?;
    Ok(Json(report.into()))
}
