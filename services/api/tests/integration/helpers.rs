use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use quotelist_api::domain::repository::{
    Mailer, QuoteGenerator, QuoteListRepository, UserRepository,
};
use quotelist_api::domain::types::{GeneratedQuote, Quote, QuoteList, User};
use quotelist_api::error::ApiError;
use quotelist_auth_types::otp::OtpClaims;
use quotelist_core::pagination::PageRequest;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-integration-tests";

/// Low bcrypt cost keeps the test suite fast; verification is cost-agnostic.
pub const TEST_BCRYPT_COST: u32 = 4;

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    /// Simulate the losing side of a concurrent signup: the existence check
    /// passed, but the store's unique index rejected the insert.
    pub conflict_on_create: bool,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            conflict_on_create: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn with_unique_violation() -> Self {
        Self {
            users: Arc::new(Mutex::new(vec![])),
            conflict_on_create: true,
        }
    }

    /// Shared handle to the stored users for post-execution inspection.
    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        if self.conflict_on_create {
            return Err(ApiError::EmailTaken);
        }
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.verified = true;
            u.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.users.lock().unwrap().clone())
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub text: String,
}

pub struct MockMailer {
    pub sent: Arc<Mutex<Vec<SentMail>>>,
    pub fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: true,
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<SentMail>>> {
        Arc::clone(&self.sent)
    }
}

impl Mailer for MockMailer {
    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<(), ApiError> {
        if self.fail {
            return Err(ApiError::Internal(anyhow::anyhow!("mailer down")));
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_owned(),
            subject: subject.to_owned(),
            text: text.to_owned(),
        });
        Ok(())
    }
}

// ── MockQuoteListRepo ────────────────────────────────────────────────────────

pub struct MockQuoteListRepo {
    pub lists: Arc<Mutex<Vec<QuoteList>>>,
}

impl MockQuoteListRepo {
    pub fn new(lists: Vec<QuoteList>) -> Self {
        Self {
            lists: Arc::new(Mutex::new(lists)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn lists_handle(&self) -> Arc<Mutex<Vec<QuoteList>>> {
        Arc::clone(&self.lists)
    }
}

impl QuoteListRepository for MockQuoteListRepo {
    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, ApiError> {
        Ok(self
            .lists
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.user_id == user_id)
            .count() as u64)
    }

    async fn create(&self, list: &QuoteList) -> Result<(), ApiError> {
        self.lists.lock().unwrap().push(list.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<QuoteList>, ApiError> {
        Ok(self
            .lists
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }

    async fn update(&self, list: &QuoteList) -> Result<(), ApiError> {
        let mut lists = self.lists.lock().unwrap();
        if let Some(stored) = lists.iter_mut().find(|l| l.id == list.id) {
            *stored = list.clone();
        }
        Ok(())
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, ApiError> {
        let mut lists = self.lists.lock().unwrap();
        let before = lists.len();
        lists.retain(|l| !(l.id == id && l.user_id == user_id));
        Ok(lists.len() < before)
    }

    async fn list_page(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<QuoteList>, u64), ApiError> {
        let lists = self.lists.lock().unwrap();
        let mut mine: Vec<QuoteList> = lists
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = mine.len() as u64;
        let paged = mine
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect();
        Ok((paged, total))
    }

    async fn find_pinned_by_user(&self, user_id: Uuid) -> Result<Vec<QuoteList>, ApiError> {
        Ok(self
            .lists
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.user_id == user_id && l.is_pinned)
            .cloned()
            .collect())
    }

    async fn search(&self, user_id: Uuid, query: &str) -> Result<Vec<QuoteList>, ApiError> {
        let needle = query.to_lowercase();
        Ok(self
            .lists
            .lock()
            .unwrap()
            .iter()
            .filter(|l| {
                l.user_id == user_id
                    && l.quotes.iter().any(|q| {
                        q.quote.to_lowercase().contains(&needle)
                            || q.origin.to_lowercase().contains(&needle)
                    })
            })
            .cloned()
            .collect())
    }
}

// ── MockQuoteGenerator ───────────────────────────────────────────────────────

pub struct MockQuoteGenerator {
    /// `None` simulates a malformed model response.
    pub quotes: Option<Vec<GeneratedQuote>>,
}

impl QuoteGenerator for MockQuoteGenerator {
    async fn generate(&self, _tags: &[String]) -> Result<Vec<GeneratedQuote>, ApiError> {
        self.quotes.clone().ok_or(ApiError::AiResponseFormat)
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(email: &str, password: &str, verified: bool) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        username: "alice".to_owned(),
        email: email.to_owned(),
        password_hash: bcrypt::hash(password, TEST_BCRYPT_COST).unwrap(),
        verified,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_list(user_id: Uuid, title: &str, quotes: Vec<(&str, &str)>) -> QuoteList {
    let now = Utc::now();
    QuoteList {
        id: Uuid::now_v7(),
        user_id,
        title: title.to_owned(),
        tags: vec!["wisdom".to_owned()],
        quotes: quotes
            .into_iter()
            .map(|(q, o)| Quote {
                id: Uuid::now_v7(),
                quote: q.to_owned(),
                origin: o.to_owned(),
            })
            .collect(),
        is_pinned: false,
        created_at: now,
        updated_at: now,
    }
}

/// A list created `minutes_ago`, for pagination-order tests.
pub fn test_list_aged(user_id: Uuid, title: &str, minutes_ago: i64) -> QuoteList {
    let mut list = test_list(user_id, title, vec![("q", "o")]);
    list.created_at = Utc::now() - Duration::minutes(minutes_ago);
    list
}

/// Decode the claims of an OTP token issued with [`TEST_JWT_SECRET`].
pub fn decode_otp_claims(token: &str) -> OtpClaims {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    jsonwebtoken::decode::<OtpClaims>(
        token,
        &DecodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        &validation,
    )
    .unwrap()
    .claims
}

/// Craft an OTP token with an arbitrary expiry (e.g. already expired).
pub fn make_otp_token(email: &str, otp: u32, exp: u64) -> String {
    let claims = OtpClaims {
        email: email.to_owned(),
        otp,
        exp,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}
