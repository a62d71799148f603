//! Discount Card API server.
//!
//! Loads configuration from the environment, connects to PostgreSQL, wires
//! the adapters into [`AppState`] and serves the `/api` router.

use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue, Method};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{fmt, EnvFilter};

use discount_card::adapters::auth::{CurrentUserValidator, JwtTokenService};
use discount_card::adapters::http::{api_router, AppState};
use discount_card::adapters::postgres::{
    PostgresAnalyticsReader, PostgresBannerRepository, PostgresBlogPostRepository,
    PostgresDiscountRuleRepository, PostgresFaqRepository, PostgresOtpSessionRepository,
    PostgresShopRepository, PostgresTransactionRepository, PostgresUserRepository,
};
use discount_card::adapters::sms::{HttpSmsGateway, LoggingOtpSender, SmsGatewayConfig};
use discount_card::config::{AppConfig, ServerConfig, SmsProvider};
use discount_card::domain::otp::OtpHasher;
use discount_card::ports::OtpSender;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        database = %config.database.redacted_url(),
        sms_provider = ?config.sms.provider,
        "Starting discount card API"
    );

    let pool = config.database.pool_options().connect(&config.database.url).await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let state = build_state(&config, pool)?;
    let app = api_router(state)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER)))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ));

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone()));

    if config.is_production() {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}

fn build_state(config: &AppConfig, pool: PgPool) -> Result<AppState, BoxError> {
    let tokens = Arc::new(JwtTokenService::from_config(&config.auth));
    let users = Arc::new(PostgresUserRepository::new(pool.clone()));

    let otp_sender: Arc<dyn OtpSender> = match config.sms.provider {
        SmsProvider::Log => Arc::new(LoggingOtpSender::new()),
        SmsProvider::Http => {
            let gateway = SmsGatewayConfig::from_sms_config(&config.sms)
                .ok_or("sms.gateway_url is required for the http provider")?;
            Arc::new(HttpSmsGateway::new(gateway)?)
        }
    };

    Ok(AppState {
        users: users.clone(),
        shops: Arc::new(PostgresShopRepository::new(pool.clone())),
        rules: Arc::new(PostgresDiscountRuleRepository::new(pool.clone())),
        transactions: Arc::new(PostgresTransactionRepository::new(pool.clone())),
        otp_sessions: Arc::new(PostgresOtpSessionRepository::new(pool.clone())),
        banners: Arc::new(PostgresBannerRepository::new(pool.clone())),
        blog_posts: Arc::new(PostgresBlogPostRepository::new(pool.clone())),
        faqs: Arc::new(PostgresFaqRepository::new(pool.clone())),
        analytics: Arc::new(PostgresAnalyticsReader::new(pool)),
        otp_sender,
        token_issuer: tokens.clone(),
        session_validator: Arc::new(CurrentUserValidator::new(tokens, users)),
        otp_hasher: OtpHasher::new(&config.otp.hash_secret)?,
        otp_policy: config.otp.policy(),
        card: config.card.clone(),
    })
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
