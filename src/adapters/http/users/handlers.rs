//! HTTP handlers for user and card endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::adapters::http::dto::PageResponse;
use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::{RequireAdmin, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::user::{
    CardAction, GetCardQuery, GetUserQuery, IssueCardCommand, ListUsersQuery, ManageCardCommand,
    ManageUserCommand, UpdateProfileCommand, UserAction,
};
use crate::domain::foundation::{AuthenticatedUser, Email, UserId};
use crate::ports::UserFilter;

use super::dto::{
    CardResponse, ChangeRoleRequest, ChangeTierRequest, IssueCardRequest, ListUsersParams,
    UpdateProfileRequest, UserResponse,
};

/// GET /api/users - Admin user list
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<PageResponse<UserResponse>>, ApiError> {
    let filter = UserFilter {
        page: params.page_params().to_request()?,
        role: params.role,
        status: params.status,
        query: params.q,
    };
    let page = state
        .get_user_handler()
        .list(ListUsersQuery { actor, filter })
        .await?;
    Ok(Json(PageResponse::from_page(page, UserResponse::from)))
}

/// GET /api/users/:id - Self or admin
pub async fn get_user(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id: UserId = parse_id("user_id", &id)?;
    let user = state
        .get_user_handler()
        .get(GetUserQuery { actor, user_id })
        .await?;
    Ok(Json(user.into()))
}

/// PATCH /api/users/me
pub async fn update_me(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let email = req
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(Email::parse)
        .transpose()?;
    let user = state
        .update_profile_handler()
        .handle(UpdateProfileCommand {
            user_id: actor.id,
            name: req.name,
            email,
        })
        .await?;
    Ok(Json(user.into()))
}

/// GET /api/users/me/card
pub async fn my_card(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
) -> Result<Json<CardResponse>, ApiError> {
    let card = state
        .get_user_handler()
        .card(GetCardQuery { user_id: actor.id })
        .await?;
    Ok(Json(CardResponse::from(&card)))
}

/// POST /api/users/:id/role
pub async fn change_role(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
    Json(req): Json<ChangeRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    manage_user(&state, actor, &id, UserAction::ChangeRole(req.role)).await
}

/// POST /api/users/:id/suspend
pub async fn suspend_user(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    manage_user(&state, actor, &id, UserAction::Suspend).await
}

/// POST /api/users/:id/reactivate
pub async fn reactivate_user(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    manage_user(&state, actor, &id, UserAction::Reactivate).await
}

/// POST /api/users/:id/card - Issue a card
pub async fn issue_card(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
    body: Option<Json<IssueCardRequest>>,
) -> Result<(axum::http::StatusCode, Json<UserResponse>), ApiError> {
    let user_id: UserId = parse_id("user_id", &id)?;
    let tier = body.and_then(|Json(req)| req.tier);
    let user = state
        .manage_card_handler()
        .issue(IssueCardCommand {
            actor,
            user_id,
            tier,
        })
        .await?;
    Ok((axum::http::StatusCode::CREATED, Json(user.into())))
}

/// POST /api/users/:id/card/block
pub async fn block_card(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    manage_card(&state, actor, &id, CardAction::Block).await
}

/// POST /api/users/:id/card/unblock
pub async fn unblock_card(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    manage_card(&state, actor, &id, CardAction::Unblock).await
}

/// POST /api/users/:id/card/tier
pub async fn change_card_tier(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
    Json(req): Json<ChangeTierRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    manage_card(&state, actor, &id, CardAction::ChangeTier(req.tier)).await
}

/// POST /api/users/:id/card/renew
pub async fn renew_card(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    manage_card(&state, actor, &id, CardAction::Renew).await
}

async fn manage_user(
    state: &AppState,
    actor: AuthenticatedUser,
    id: &str,
    action: UserAction,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id: UserId = parse_id("user_id", id)?;
    let user = state
        .manage_user_handler()
        .handle(ManageUserCommand {
            actor,
            user_id,
            action,
        })
        .await?;
    Ok(Json(user.into()))
}

async fn manage_card(
    state: &AppState,
    actor: AuthenticatedUser,
    id: &str,
    action: CardAction,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id: UserId = parse_id("user_id", id)?;
    let user = state
        .manage_card_handler()
        .handle(ManageCardCommand {
            actor,
            user_id,
            action,
        })
        .await?;
    Ok(Json(user.into()))
}
