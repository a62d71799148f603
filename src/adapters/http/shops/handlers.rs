//! HTTP handlers for shop endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::discounts::dto::{ListRulesParams, RuleRequest, RuleResponse};
use crate::adapters::http::dto::PageResponse;
use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::{OptionalAuth, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::discount::{CreateRuleCommand, ListRulesQuery};
use crate::application::handlers::shop::{
    ChangeShopStatusCommand, CreateShopCommand, GetShopQuery, SearchShopsQuery, ShopAction,
    UpdateShopCommand,
};
use crate::domain::foundation::{
    AuthenticatedUser, DomainError, ErrorCode, GeoPoint, ShopId, UserId,
};
use crate::domain::shop::{NearFilter, ShopSearch};

use super::dto::{SearchShopsParams, ShopRequest, ShopResponse};

/// GET /api/shops - Search the shop directory
pub async fn search_shops(
    State(state): State<AppState>,
    OptionalAuth(actor): OptionalAuth,
    Query(params): Query<SearchShopsParams>,
) -> Result<Json<PageResponse<ShopResponse>>, ApiError> {
    let near = match (params.lat, params.lng, params.radius_km) {
        (Some(lat), Some(lng), Some(radius)) => {
            Some(NearFilter::new(GeoPoint::new(lat, lng)?, radius)?)
        }
        (None, None, None) => None,
        _ => {
            return Err(ApiError::bad_request(
                "radius_km",
                "lat, lng and radius_km must be given together",
            ))
        }
    };

    let owner_id = if params.mine {
        let actor = actor.as_ref().ok_or_else(|| {
            ApiError::from(DomainError::new(ErrorCode::Unauthorized, "Authentication required"))
        })?;
        Some(actor.id)
    } else {
        None
    };

    // Listing one's own shops defaults to every status.
    let status = match (params.status, owner_id) {
        (Some(status), _) => Some(status),
        (None, Some(_)) => None,
        (None, None) => ShopSearch::default().status,
    };

    let search = ShopSearch {
        query: params.q.clone(),
        category: params.category,
        near,
        status,
        owner_id,
        page: params.page_params().to_request()?,
    };

    let page = state
        .search_shops_handler()
        .search(SearchShopsQuery { actor, search })
        .await?;
    Ok(Json(PageResponse::from_page(page, ShopResponse::from)))
}

/// GET /api/shops/:id
pub async fn get_shop(
    State(state): State<AppState>,
    OptionalAuth(actor): OptionalAuth,
    Path(id): Path<String>,
) -> Result<Json<ShopResponse>, ApiError> {
    let shop_id: ShopId = parse_id("shop_id", &id)?;
    let shop = state
        .search_shops_handler()
        .get(GetShopQuery { actor, shop_id })
        .await?;
    Ok(Json(shop.into()))
}

/// POST /api/shops - Register a shop (pending approval)
pub async fn create_shop(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Json(req): Json<ShopRequest>,
) -> Result<(StatusCode, Json<ShopResponse>), ApiError> {
    let owner_id = req
        .owner_id
        .as_deref()
        .map(|raw| parse_id::<UserId>("owner_id", raw))
        .transpose()?;
    let shop = state
        .create_shop_handler()
        .handle(CreateShopCommand {
            actor,
            details: req.to_details()?,
            owner_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(shop.into())))
}

/// PATCH /api/shops/:id - Replace a shop's details (owner or admin)
pub async fn update_shop(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<ShopRequest>,
) -> Result<Json<ShopResponse>, ApiError> {
    let shop_id: ShopId = parse_id("shop_id", &id)?;
    let shop = state
        .manage_shop_handler()
        .update(UpdateShopCommand {
            actor,
            shop_id,
            details: req.to_details()?,
        })
        .await?;
    Ok(Json(shop.into()))
}

/// POST /api/shops/:id/approve
pub async fn approve_shop(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<ShopResponse>, ApiError> {
    change_status(&state, actor, &id, ShopAction::Approve).await
}

/// POST /api/shops/:id/suspend
pub async fn suspend_shop(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<ShopResponse>, ApiError> {
    change_status(&state, actor, &id, ShopAction::Suspend).await
}

/// POST /api/shops/:id/reinstate
pub async fn reinstate_shop(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<ShopResponse>, ApiError> {
    change_status(&state, actor, &id, ShopAction::Reinstate).await
}

/// POST /api/shops/:id/close
pub async fn close_shop(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<ShopResponse>, ApiError> {
    change_status(&state, actor, &id, ShopAction::Close).await
}

/// GET /api/shops/:id/rules - Rules offered at a shop
pub async fn list_shop_rules(
    State(state): State<AppState>,
    OptionalAuth(actor): OptionalAuth,
    Path(id): Path<String>,
    Query(params): Query<ListRulesParams>,
) -> Result<Json<Vec<RuleResponse>>, ApiError> {
    let shop_id: ShopId = parse_id("shop_id", &id)?;
    let rules = state
        .list_rules_handler()
        .handle(ListRulesQuery {
            actor,
            shop_id: Some(shop_id),
            include_inactive: params.include_inactive,
        })
        .await?;
    Ok(Json(rules.iter().map(RuleResponse::from).collect()))
}

/// POST /api/shops/:id/rules - Create a shop rule (owner or admin)
pub async fn create_shop_rule(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<RuleRequest>,
) -> Result<(StatusCode, Json<RuleResponse>), ApiError> {
    let shop_id: ShopId = parse_id("shop_id", &id)?;
    let rule = state
        .manage_rules_handler()
        .create(CreateRuleCommand {
            actor,
            shop_id: Some(shop_id),
            terms: req.into_terms()?,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(rule.into())))
}

async fn change_status(
    state: &AppState,
    actor: AuthenticatedUser,
    id: &str,
    action: ShopAction,
) -> Result<Json<ShopResponse>, ApiError> {
    let shop_id: ShopId = parse_id("shop_id", id)?;
    let shop = state
        .manage_shop_handler()
        .change_status(ChangeShopStatusCommand {
            actor,
            shop_id,
            action,
        })
        .await?;
    Ok(Json(shop.into()))
}
