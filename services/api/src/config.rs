/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing OTP and session tokens.
    pub jwt_secret: String,
    /// Transactional-mail API key.
    pub mail_api_key: String,
    /// Sender address for outgoing mail.
    pub mail_sender: String,
    /// Gemini API key for quote generation.
    pub gemini_api_key: String,
    /// Allowed cross-origin frontend (e.g. "https://app.example.com").
    pub frontend_origin: String,
    /// TCP port to listen on (default 3000). Env var: `API_PORT`.
    pub api_port: u16,
    /// Whether session cookies carry the Secure flag (default true; set
    /// `COOKIE_SECURE=false` for local development over plain HTTP).
    pub cookie_secure: bool,
    /// UTC hour of the daily digest run, 0–23 (default 10). Env var:
    /// `DIGEST_HOUR_UTC`.
    pub digest_hour_utc: u32,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            mail_api_key: std::env::var("MAIL_API_KEY").expect("MAIL_API_KEY"),
            mail_sender: std::env::var("MAIL_SENDER").expect("MAIL_SENDER"),
            gemini_api_key: std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY"),
            frontend_origin: std::env::var("FRONTEND_ORIGIN").expect("FRONTEND_ORIGIN"),
            api_port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            digest_hour_utc: std::env::var("DIGEST_HOUR_UTC")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|h| *h < 24)
                .unwrap_or(10),
        }
    }
}
