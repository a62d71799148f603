//! HTTP handlers for card transactions.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::dto::PageResponse;
use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::{RequireAdmin, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::transaction::{
    GetTransactionQuery, ListTransactionsQuery, ManageTransactionCommand,
    RecordTransactionCommand, TransactionAction, TransactionScope,
};
use crate::domain::foundation::{AuthenticatedUser, Money, ShopId, TransactionId};
use crate::domain::user::CardNumber;

use super::dto::{ListTransactionsParams, RecordTransactionRequest, TransactionResponse};

type TransactionPage = Json<PageResponse<TransactionResponse>>;

/// POST /api/transactions - Record a purchase at a shop
///
/// The discount is resolved server-side; the client only sends the
/// pre-discount amount.
pub async fn record_transaction(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Json(req): Json<RecordTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let shop_id: ShopId = parse_id("shop_id", &req.shop_id)?;
    let tx = state
        .record_transaction_handler()
        .handle(RecordTransactionCommand {
            actor,
            shop_id,
            card_number: CardNumber::parse(&req.card_number)?,
            amount: Money::from_cents_field("amount_cents", req.amount_cents)?,
            note: req.note,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(tx.into())))
}

/// GET /api/transactions - All transactions (admin)
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Query(params): Query<ListTransactionsParams>,
) -> Result<TransactionPage, ApiError> {
    list(&state, actor, TransactionScope::All, params).await
}

/// GET /api/transactions/mine - Purchases made with the caller's card
pub async fn list_mine(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Query(params): Query<ListTransactionsParams>,
) -> Result<TransactionPage, ApiError> {
    list(&state, actor, TransactionScope::Mine, params).await
}

/// GET /api/transactions/shop/:shop_id - Sales at a shop (owner or admin)
pub async fn list_for_shop(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(shop_id): Path<String>,
    Query(params): Query<ListTransactionsParams>,
) -> Result<TransactionPage, ApiError> {
    let shop_id: ShopId = parse_id("shop_id", &shop_id)?;
    list(&state, actor, TransactionScope::Shop(shop_id), params).await
}

/// GET /api/transactions/:id
pub async fn get_transaction(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let transaction_id: TransactionId = parse_id("transaction_id", &id)?;
    let tx = state
        .list_transactions_handler()
        .get(GetTransactionQuery {
            actor,
            transaction_id,
        })
        .await?;
    Ok(Json(tx.into()))
}

/// POST /api/transactions/:id/complete
pub async fn complete_transaction(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<TransactionResponse>, ApiError> {
    manage(&state, actor, &id, TransactionAction::Complete).await
}

/// POST /api/transactions/:id/cancel
pub async fn cancel_transaction(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<TransactionResponse>, ApiError> {
    manage(&state, actor, &id, TransactionAction::Cancel).await
}

/// POST /api/transactions/:id/refund
pub async fn refund_transaction(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<TransactionResponse>, ApiError> {
    manage(&state, actor, &id, TransactionAction::Refund).await
}

async fn list(
    state: &AppState,
    actor: AuthenticatedUser,
    scope: TransactionScope,
    params: ListTransactionsParams,
) -> Result<TransactionPage, ApiError> {
    let page = state
        .list_transactions_handler()
        .list(ListTransactionsQuery {
            actor,
            scope,
            status: params.status,
            range: params.range_params().to_range()?,
            page: params.page_params().to_request()?,
        })
        .await?;
    Ok(Json(PageResponse::from_page(page, TransactionResponse::from)))
}

async fn manage(
    state: &AppState,
    actor: AuthenticatedUser,
    id: &str,
    action: TransactionAction,
) -> Result<Json<TransactionResponse>, ApiError> {
    let transaction_id: TransactionId = parse_id("transaction_id", id)?;
    let tx = state
        .manage_transaction_handler()
        .handle(ManageTransactionCommand {
            actor,
            transaction_id,
            action,
        })
        .await?;
    Ok(Json(tx.into()))
}
