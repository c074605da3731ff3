use std::sync::Arc;

use sea_orm::DatabaseConnection;

use quotelist_core::ratelimit::RateCounter;

use crate::infra::db::{DbQuoteListRepository, DbUserRepository};
use crate::infra::genai::GeminiQuoteGenerator;
use crate::infra::mailer::HttpMailer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub http: reqwest::Client,
    pub rate_counter: Arc<dyn RateCounter>,
    pub jwt_secret: String,
    pub cookie_secure: bool,
    pub mail_api_key: String,
    pub mail_sender: String,
    pub gemini_api_key: String,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn quote_list_repo(&self) -> DbQuoteListRepository {
        DbQuoteListRepository {
            db: self.db.clone(),
        }
    }

    pub fn mailer(&self) -> HttpMailer {
        HttpMailer {
            http: self.http.clone(),
            api_key: self.mail_api_key.clone(),
            sender: self.mail_sender.clone(),
        }
    }

    pub fn quote_generator(&self) -> GeminiQuoteGenerator {
        GeminiQuoteGenerator {
            http: self.http.clone(),
            api_key: self.gemini_api_key.clone(),
        }
    }
}
