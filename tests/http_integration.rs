//! Integration tests for the REST API.
//!
//! Drives the full `/api` router over in-memory adapters with mock tokens:
//! 1. Authentication and role checks surface as 401/403 with error bodies
//! 2. Shop onboarding, rules, quotes and transactions work end to end
//! 3. CMS visibility follows publication state

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;
use discount_card::adapters::auth::{MockSessionValidator, MockTokenIssuer};
use discount_card::domain::foundation::{AuthenticatedUser, PhoneNumber, Role};
use discount_card::domain::user::User;
use discount_card::ports::UserRepository;

const ADMIN: &str = "admin-token";
const OWNER: &str = "owner-token";
const CUSTOMER: &str = "customer-token";

struct Fixture {
    app: TestApp,
    owner: User,
    customer: User,
}

fn user(phone: &str, role: Role) -> User {
    User::register(PhoneNumber::parse(phone).unwrap(), role)
}

fn auth(user: &User) -> AuthenticatedUser {
    AuthenticatedUser::new(*user.id(), user.phone().clone(), user.role())
}

async fn fixture() -> Fixture {
    let admin = user("+998900000001", Role::Admin);
    let owner = user("+998900000002", Role::ShopOwner);
    let customer = user("+998900000003", Role::Customer);

    let validator = MockSessionValidator::new()
        .with_user(ADMIN, auth(&admin))
        .with_user(OWNER, auth(&owner))
        .with_user(CUSTOMER, auth(&customer));
    let app = TestApp::new(Arc::new(MockTokenIssuer::new()), Arc::new(validator));

    for u in [&admin, &owner, &customer] {
        app.users.save(u).await.unwrap();
    }

    Fixture {
        app,
        owner,
        customer,
    }
}

fn shop_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "category": "cafe",
        "address": "12 Amir Temur St",
        "latitude": 41.311,
        "longitude": 69.279,
    })
}

/// Registers a shop as the owner and approves it as admin.
async fn active_shop(f: &Fixture) -> String {
    let (status, body) = f.app.post("/api/shops", Some(OWNER), shop_body("Corner Cafe")).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, _) = f
        .app
        .post_empty(&format!("/api/shops/{}/approve", id), Some(ADMIN))
        .await;
    assert_eq!(status, StatusCode::OK);
    id
}

/// Issues a card to the customer and returns the full card number.
async fn customer_card(f: &Fixture) -> String {
    let (status, body) = f
        .app
        .post(
            &format!("/api/users/{}/card", f.customer.id()),
            Some(ADMIN),
            json!({ "tier": "gold" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["card"]["number"].as_str().unwrap().to_string()
}

// =============================================================================
// Health and authentication
// =============================================================================

#[tokio::test]
async fn health_is_public() {
    let f = fixture().await;
    let (status, body) = f.app.get("/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let f = fixture().await;
    let (status, body) = f.app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn unknown_token_is_rejected_by_middleware() {
    let f = fixture().await;
    let (status, _) = f.app.get("/api/health", Some("forged")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_profile_for_token() {
    let f = fixture().await;
    let (status, body) = f.app.get("/api/auth/me", Some(CUSTOMER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], f.customer.id().to_string());
    assert_eq!(body["role"], "customer");
    assert!(body["card"].is_null());
}

#[tokio::test]
async fn user_list_is_admin_only() {
    let f = fixture().await;

    let (status, body) = f.app.get("/api/users", Some(CUSTOMER)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, body) = f.app.get("/api/users?role=shop_owner", Some(ADMIN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], f.owner.id().to_string());
}

#[tokio::test]
async fn malformed_path_id_is_a_validation_error() {
    let f = fixture().await;
    let (status, body) = f.app.get("/api/shops/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(body["details"]["field"], "shop_id");
}

#[tokio::test]
async fn profile_update_validates_email() {
    let f = fixture().await;
    let (status, _) = f
        .app
        .send(
            Method::PATCH,
            "/api/users/me",
            Some(CUSTOMER),
            Some(json!({ "name": "Dilnoza", "email": "nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = f
        .app
        .send(
            Method::PATCH,
            "/api/users/me",
            Some(CUSTOMER),
            Some(json!({ "name": "Dilnoza", "email": "dilnoza@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Dilnoza");
    assert_eq!(body["email"], "dilnoza@example.com");
}

// =============================================================================
// Shops
// =============================================================================

#[tokio::test]
async fn customers_cannot_register_shops() {
    let f = fixture().await;
    let (status, _) = f.app.post("/api/shops", Some(CUSTOMER), shop_body("Nope")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn pending_shop_is_hidden_until_approved() {
    let f = fixture().await;
    let (status, body) = f.app.post("/api/shops", Some(OWNER), shop_body("Corner Cafe")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["accepting_cards"], false);
    let id = body["id"].as_str().unwrap().to_string();
    let path = format!("/api/shops/{}", id);

    let (status, _) = f.app.get(&path, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = f.app.get(&path, Some(OWNER)).await;
    assert_eq!(status, StatusCode::OK);

    // Approval is an admin action.
    let (status, _) = f.app.post_empty(&format!("{}/approve", path), Some(OWNER)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = f.app.post_empty(&format!("{}/approve", path), Some(ADMIN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");

    let (status, body) = f.app.get("/api/shops?q=corner", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], id);
}

#[tokio::test]
async fn approving_twice_is_a_conflict() {
    let f = fixture().await;
    let id = active_shop(&f).await;
    let (status, body) = f
        .app
        .post_empty(&format!("/api/shops/{}/approve", id), Some(ADMIN))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE_TRANSITION");
}

#[tokio::test]
async fn near_search_requires_all_coordinates() {
    let f = fixture().await;
    let (status, _) = f.app.get("/api/shops?lat=41.3&lng=69.2", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    active_shop(&f).await;
    let (status, body) = f
        .app
        .get("/api/shops?lat=41.3&lng=69.28&radius_km=5", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert!(body["items"][0]["distance_km"].as_f64().unwrap() < 5.0);
}

// =============================================================================
// Rules, quotes and transactions
// =============================================================================

#[tokio::test]
async fn purchase_flow_applies_best_rule() {
    let f = fixture().await;
    let shop_id = active_shop(&f).await;
    let card = customer_card(&f).await;

    let (status, rule) = f
        .app
        .post(
            &format!("/api/shops/{}/rules", shop_id),
            Some(OWNER),
            json!({ "name": "Ten off", "kind": "percentage", "value": 10 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(rule["is_active"], true);

    let (status, rules) = f.app.get(&format!("/api/shops/{}/rules", shop_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rules.as_array().unwrap().len(), 1);

    let (status, quote) = f
        .app
        .post(
            "/api/discounts/quote",
            Some(OWNER),
            json!({ "shop_id": shop_id, "card_number": card, "amount_cents": 25_000 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["discount_cents"], 2_500);
    assert_eq!(quote["final_amount_cents"], 22_500);
    assert_eq!(quote["applied_rule"]["rule_id"], rule["id"]);
    assert_eq!(quote["tier"], "gold");

    let (status, tx) = f
        .app
        .post(
            "/api/transactions",
            Some(OWNER),
            json!({ "shop_id": shop_id, "card_number": card, "amount_cents": 25_000 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tx["status"], "pending");
    assert_eq!(tx["discount_amount_cents"], 2_500);
    assert_ne!(tx["card_number"], card.as_str(), "card number must be masked");
    let tx_path = format!("/api/transactions/{}", tx["id"].as_str().unwrap());

    // The customer can see it but not settle it.
    let (status, _) = f.app.get(&tx_path, Some(CUSTOMER)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = f
        .app
        .post_empty(&format!("{}/complete", tx_path), Some(CUSTOMER))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, done) = f
        .app
        .post_empty(&format!("{}/complete", tx_path), Some(OWNER))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "completed");
    assert!(done["completed_at"].is_string());

    let (status, mine) = f.app.get("/api/transactions/mine", Some(CUSTOMER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["total"], 1);

    let (status, sales) = f
        .app
        .get(&format!("/api/transactions/shop/{}", shop_id), Some(OWNER))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sales["total"], 1);

    let (status, overview) = f.app.get("/api/analytics/overview", Some(ADMIN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["completed_count"], 1);
    assert_eq!(overview["discount_amount_cents"], 2_500);
}

#[tokio::test]
async fn blocked_card_cannot_be_used() {
    let f = fixture().await;
    let shop_id = active_shop(&f).await;
    let card = customer_card(&f).await;

    let (status, body) = f
        .app
        .post_empty(&format!("/api/users/{}/card/block", f.customer.id()), Some(ADMIN))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["card"]["status"], "blocked");

    let (status, body) = f
        .app
        .post(
            "/api/transactions",
            Some(OWNER),
            json!({ "shop_id": shop_id, "card_number": card, "amount_cents": 1_000 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "CARD_NOT_USABLE");
}

#[tokio::test]
async fn strangers_cannot_quote_at_a_shop() {
    let f = fixture().await;
    let shop_id = active_shop(&f).await;
    let card = customer_card(&f).await;

    let (status, _) = f
        .app
        .post(
            "/api/discounts/quote",
            Some(CUSTOMER),
            json!({ "shop_id": shop_id, "card_number": card, "amount_cents": 1_000 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn platform_rules_are_admin_managed() {
    let f = fixture().await;
    let body = json!({ "name": "Launch week", "kind": "fixed_amount", "value": 500 });

    let (status, _) = f.app.post("/api/discount-rules", Some(OWNER), body.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, rule) = f.app.post("/api/discount-rules", Some(ADMIN), body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(rule["shop_id"].is_null());
    let path = format!("/api/discount-rules/{}", rule["id"].as_str().unwrap());

    let (status, _) = f.app.post_empty(&format!("{}/deactivate", path), Some(ADMIN)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, public) = f.app.get("/api/discount-rules", None).await;
    assert!(public.as_array().unwrap().is_empty());
    let (_, all) = f
        .app
        .get("/api/discount-rules?include_inactive=true", Some(ADMIN))
        .await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, _) = f.app.send(Method::DELETE, &path, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = f.app.send(Method::DELETE, &path, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// CMS
// =============================================================================

#[tokio::test]
async fn blog_post_is_public_only_when_published() {
    let f = fixture().await;
    let (status, post) = f
        .app
        .post(
            "/api/cms/blogs",
            Some(ADMIN),
            json!({ "title": "Spring Sale", "body": "Up to 30% off." }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(post["slug"], "spring-sale");
    assert_eq!(post["status"], "draft");

    let (status, _) = f.app.get("/api/cms/blogs/spring-sale", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = post["id"].as_str().unwrap();
    let (status, _) = f
        .app
        .post_empty(&format!("/api/cms/blogs/{}/publish", id), Some(ADMIN))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = f.app.get("/api/cms/blogs/spring-sale", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["published_at"].is_string());

    let (_, list) = f.app.get("/api/cms/blogs", None).await;
    assert_eq!(list["total"], 1);
}

#[tokio::test]
async fn duplicate_blog_slug_conflicts() {
    let f = fixture().await;
    let body = json!({ "title": "Hello", "body": "First", "slug": "hello" });
    let (status, _) = f.app.post("/api/cms/blogs", Some(ADMIN), body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, err) = f.app.post("/api/cms/blogs", Some(ADMIN), body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], "SLUG_TAKEN");
}

#[tokio::test]
async fn inactive_faqs_are_hidden_from_the_public() {
    let f = fixture().await;
    for (question, active) in [("Visible?", true), ("Hidden?", false)] {
        let (status, _) = f
            .app
            .post(
                "/api/cms/faqs",
                Some(ADMIN),
                json!({ "question": question, "answer": "Yes.", "active": active }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, public) = f.app.get("/api/cms/faqs", None).await;
    assert_eq!(public.as_array().unwrap().len(), 1);
    assert_eq!(public[0]["question"], "Visible?");

    let (status, _) = f.app.get("/api/cms/admin/faqs", Some(CUSTOMER)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, all) = f.app.get("/api/cms/admin/faqs", Some(ADMIN)).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}
