use std::net::SocketAddr;
use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use quotelist_api::config::ApiConfig;
use quotelist_api::router::build_router;
use quotelist_api::scheduler::run_daily_digest;
use quotelist_api::state::AppState;
use quotelist_core::ratelimit::InMemoryRateCounter;

#[tokio::main]
async fn main() {
    quotelist_core::tracing::init_tracing();

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        http: reqwest::Client::new(),
        rate_counter: Arc::new(InMemoryRateCounter::new()),
        jwt_secret: config.jwt_secret,
        cookie_secure: config.cookie_secure,
        mail_api_key: config.mail_api_key,
        mail_sender: config.mail_sender,
        gemini_api_key: config.gemini_api_key,
    };

    // Daily digest tick runs alongside the HTTP server.
    tokio::spawn(run_daily_digest(state.clone(), config.digest_hour_utc));

    let router = build_router(state, &config.frontend_origin);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("api listening on {addr}");
    // Connect-info feeds the rate limiter's client keying.
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server error");
}
