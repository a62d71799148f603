//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::application::handlers::analytics::AnalyticsHandler;
use crate::application::handlers::cms::{BannerHandler, BlogPostHandler, FaqHandler};
use crate::application::handlers::discount::{ListRulesHandler, ManageRulesHandler, QuoteDiscountHandler};
use crate::application::handlers::otp::{RequestOtpHandler, ResendOtpHandler, VerifyOtpHandler};
use crate::application::handlers::shop::{CreateShopHandler, ManageShopHandler, SearchShopsHandler};
use crate::application::handlers::transaction::{
    ListTransactionsHandler, ManageTransactionHandler, RecordTransactionHandler,
};
use crate::application::handlers::user::{
    GetUserHandler, ManageCardHandler, ManageUserHandler, UpdateProfileHandler,
};
use crate::config::CardConfig;
use crate::domain::otp::{OtpHasher, OtpPolicy};
use crate::ports::{
    AnalyticsReader, BannerRepository, BlogPostRepository, DiscountRuleRepository, FaqRepository,
    OtpSender, OtpSessionRepository, SessionValidator, ShopRepository, TokenIssuer,
    TransactionRepository, UserRepository,
};

/// Ports and settings shared by every request.
///
/// Cloned per request; everything inside is reference counted. Handlers are
/// created on demand from the shared ports.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub shops: Arc<dyn ShopRepository>,
    pub rules: Arc<dyn DiscountRuleRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub otp_sessions: Arc<dyn OtpSessionRepository>,
    pub banners: Arc<dyn BannerRepository>,
    pub blog_posts: Arc<dyn BlogPostRepository>,
    pub faqs: Arc<dyn FaqRepository>,
    pub analytics: Arc<dyn AnalyticsReader>,
    pub otp_sender: Arc<dyn OtpSender>,
    pub token_issuer: Arc<dyn TokenIssuer>,
    pub session_validator: Arc<dyn SessionValidator>,
    pub otp_hasher: OtpHasher,
    pub otp_policy: OtpPolicy,
    pub card: CardConfig,
}

impl AppState {
    // ── OTP ──────────────────────────────────────────────────────────────

    pub fn request_otp_handler(&self) -> RequestOtpHandler {
        RequestOtpHandler::new(
            self.otp_sessions.clone(),
            self.users.clone(),
            self.otp_sender.clone(),
            self.otp_hasher.clone(),
            self.otp_policy,
        )
    }

    pub fn resend_otp_handler(&self) -> ResendOtpHandler {
        ResendOtpHandler::new(
            self.otp_sessions.clone(),
            self.otp_sender.clone(),
            self.otp_hasher.clone(),
            self.otp_policy,
        )
    }

    pub fn verify_otp_handler(&self) -> VerifyOtpHandler {
        VerifyOtpHandler::new(
            self.otp_sessions.clone(),
            self.users.clone(),
            self.token_issuer.clone(),
            self.otp_hasher.clone(),
        )
    }

    // ── Users ────────────────────────────────────────────────────────────

    pub fn get_user_handler(&self) -> GetUserHandler {
        GetUserHandler::new(self.users.clone())
    }

    pub fn update_profile_handler(&self) -> UpdateProfileHandler {
        UpdateProfileHandler::new(self.users.clone())
    }

    pub fn manage_user_handler(&self) -> ManageUserHandler {
        ManageUserHandler::new(self.users.clone())
    }

    pub fn manage_card_handler(&self) -> ManageCardHandler {
        ManageCardHandler::new(self.users.clone(), self.card.validity_days, self.card.default_tier)
    }

    // ── Shops and discounts ──────────────────────────────────────────────

    pub fn create_shop_handler(&self) -> CreateShopHandler {
        CreateShopHandler::new(self.shops.clone(), self.users.clone())
    }

    pub fn manage_shop_handler(&self) -> ManageShopHandler {
        ManageShopHandler::new(self.shops.clone())
    }

    pub fn search_shops_handler(&self) -> SearchShopsHandler {
        SearchShopsHandler::new(self.shops.clone())
    }

    pub fn manage_rules_handler(&self) -> ManageRulesHandler {
        ManageRulesHandler::new(self.rules.clone(), self.shops.clone())
    }

    pub fn list_rules_handler(&self) -> ListRulesHandler {
        ListRulesHandler::new(self.rules.clone(), self.shops.clone())
    }

    pub fn quote_discount_handler(&self) -> QuoteDiscountHandler {
        QuoteDiscountHandler::new(self.users.clone(), self.shops.clone(), self.rules.clone())
    }

    // ── Transactions ─────────────────────────────────────────────────────

    pub fn record_transaction_handler(&self) -> RecordTransactionHandler {
        RecordTransactionHandler::new(self.transactions.clone(), self.quote_discount_handler())
    }

    pub fn manage_transaction_handler(&self) -> ManageTransactionHandler {
        ManageTransactionHandler::new(self.transactions.clone(), self.shops.clone())
    }

    pub fn list_transactions_handler(&self) -> ListTransactionsHandler {
        ListTransactionsHandler::new(self.transactions.clone(), self.shops.clone())
    }

    // ── CMS and analytics ────────────────────────────────────────────────

    pub fn banner_handler(&self) -> BannerHandler {
        BannerHandler::new(self.banners.clone())
    }

    pub fn blog_post_handler(&self) -> BlogPostHandler {
        BlogPostHandler::new(self.blog_posts.clone())
    }

    pub fn faq_handler(&self) -> FaqHandler {
        FaqHandler::new(self.faqs.clone())
    }

    pub fn analytics_handler(&self) -> AnalyticsHandler {
        AnalyticsHandler::new(self.analytics.clone(), self.shops.clone())
    }
}
