//! Shared harness for HTTP integration tests.
//!
//! Builds the real `/api` router over in-memory adapters and drives it with
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use discount_card::adapters::http::{api_router, AppState};
use discount_card::adapters::memory::{
    InMemoryAnalyticsReader, InMemoryBannerRepository, InMemoryBlogPostRepository,
    InMemoryDiscountRuleRepository, InMemoryFaqRepository, InMemoryOtpSessionRepository,
    InMemoryShopRepository, InMemoryTransactionRepository, InMemoryUserRepository,
};
use discount_card::adapters::sms::RecordingOtpSender;
use discount_card::config::CardConfig;
use discount_card::domain::otp::{OtpHasher, OtpPolicy};
use discount_card::domain::user::CardTier;
use discount_card::ports::{SessionValidator, TokenIssuer};

pub struct TestApp {
    pub router: Router,
    pub users: InMemoryUserRepository,
    pub shops: InMemoryShopRepository,
    pub transactions: InMemoryTransactionRepository,
    pub sms: RecordingOtpSender,
}

impl TestApp {
    pub fn new(
        token_issuer: Arc<dyn TokenIssuer>,
        session_validator: Arc<dyn SessionValidator>,
    ) -> Self {
        let users = InMemoryUserRepository::new();
        let shops = InMemoryShopRepository::new();
        let transactions = InMemoryTransactionRepository::new();
        let sms = RecordingOtpSender::new();

        let state = AppState {
            users: Arc::new(users.clone()),
            shops: Arc::new(shops.clone()),
            rules: Arc::new(InMemoryDiscountRuleRepository::new()),
            transactions: Arc::new(transactions.clone()),
            otp_sessions: Arc::new(InMemoryOtpSessionRepository::new()),
            banners: Arc::new(InMemoryBannerRepository::new()),
            blog_posts: Arc::new(InMemoryBlogPostRepository::new()),
            faqs: Arc::new(InMemoryFaqRepository::new()),
            analytics: Arc::new(InMemoryAnalyticsReader::new(
                users.clone(),
                shops.clone(),
                transactions.clone(),
            )),
            otp_sender: Arc::new(sms.clone()),
            token_issuer,
            session_validator,
            otp_hasher: OtpHasher::new(&SecretString::new("integration-test-secret".to_string()))
                .unwrap(),
            otp_policy: OtpPolicy::default(),
            card: CardConfig {
                validity_days: 365,
                default_tier: CardTier::Silver,
            },
        };

        Self {
            router: api_router(state),
            users,
            shops,
            transactions,
            sms,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, None).await
    }
}
