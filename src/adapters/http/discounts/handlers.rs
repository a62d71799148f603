//! HTTP handlers for platform rules, rule edits and discount quotes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::{OptionalAuth, RequireAdmin, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::discount::{
    ChangeRuleStateCommand, CreateRuleCommand, DeleteRuleCommand, ListRulesQuery,
    QuoteDiscountCommand, RuleAction, UpdateRuleCommand,
};
use crate::domain::foundation::{AuthenticatedUser, DiscountRuleId, Money, ShopId};
use crate::domain::user::CardNumber;

use super::dto::{ListRulesParams, QuoteRequest, QuoteResponse, RuleRequest, RuleResponse};

/// GET /api/discount-rules - Platform-wide rules
///
/// Public; admins may add `include_inactive=true`.
pub async fn list_platform_rules(
    State(state): State<AppState>,
    OptionalAuth(actor): OptionalAuth,
    Query(params): Query<ListRulesParams>,
) -> Result<Json<Vec<RuleResponse>>, ApiError> {
    let rules = state
        .list_rules_handler()
        .handle(ListRulesQuery {
            actor,
            shop_id: None,
            include_inactive: params.include_inactive,
        })
        .await?;
    Ok(Json(rules.iter().map(RuleResponse::from).collect()))
}

/// POST /api/discount-rules - Create a platform-wide rule (admin)
pub async fn create_platform_rule(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Json(req): Json<RuleRequest>,
) -> Result<(StatusCode, Json<RuleResponse>), ApiError> {
    let rule = state
        .manage_rules_handler()
        .create(CreateRuleCommand {
            actor,
            shop_id: None,
            terms: req.into_terms()?,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(rule.into())))
}

/// PATCH /api/discount-rules/:id - Replace a rule's terms
pub async fn update_rule(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<RuleRequest>,
) -> Result<Json<RuleResponse>, ApiError> {
    let rule_id: DiscountRuleId = parse_id("rule_id", &id)?;
    let rule = state
        .manage_rules_handler()
        .update(UpdateRuleCommand {
            actor,
            rule_id,
            terms: req.into_terms()?,
        })
        .await?;
    Ok(Json(rule.into()))
}

/// POST /api/discount-rules/:id/activate
pub async fn activate_rule(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<RuleResponse>, ApiError> {
    change_state(&state, actor, &id, RuleAction::Activate).await
}

/// POST /api/discount-rules/:id/deactivate
pub async fn deactivate_rule(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<RuleResponse>, ApiError> {
    change_state(&state, actor, &id, RuleAction::Deactivate).await
}

/// DELETE /api/discount-rules/:id
pub async fn delete_rule(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let rule_id: DiscountRuleId = parse_id("rule_id", &id)?;
    state
        .manage_rules_handler()
        .delete(DeleteRuleCommand { actor, rule_id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/discounts/quote - Price a purchase without recording it
pub async fn quote(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let shop_id: ShopId = parse_id("shop_id", &req.shop_id)?;
    let quote = state
        .quote_discount_handler()
        .handle(QuoteDiscountCommand {
            actor,
            shop_id,
            card_number: CardNumber::parse(&req.card_number)?,
            amount: Money::from_cents_field("amount_cents", req.amount_cents)?,
        })
        .await?;
    Ok(Json(QuoteResponse::from(&quote)))
}

async fn change_state(
    state: &AppState,
    actor: AuthenticatedUser,
    id: &str,
    action: RuleAction,
) -> Result<Json<RuleResponse>, ApiError> {
    let rule_id: DiscountRuleId = parse_id("rule_id", id)?;
    let rule = state
        .manage_rules_handler()
        .change_state(ChangeRuleStateCommand {
            actor,
            rule_id,
            action,
        })
        .await?;
    Ok(Json(rule.into()))
}
