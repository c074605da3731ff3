use chrono::{DateTime, Utc};
use regex::Regex;
use uuid::Uuid;

/// Account record. `password_hash` never leaves the service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's quote collection with its quotes in display order.
#[derive(Debug, Clone)]
pub struct QuoteList {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub tags: Vec<String>,
    pub quotes: Vec<Quote>,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single quote within a list.
#[derive(Debug, Clone)]
pub struct Quote {
    pub id: Uuid,
    pub quote: String,
    pub origin: String,
}

/// A quote proposed by the generative-AI collaborator (not yet persisted).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GeneratedQuote {
    pub quote: String,
    pub origin: String,
}

/// Maximum number of quote lists per user.
pub const MAX_QUOTE_LISTS: u64 = 100;

/// Maximum number of quotes per list.
pub const MAX_QUOTES: usize = 100;

/// Maximum number of tags per list.
pub const MAX_TAGS: usize = 10;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// bcrypt work factor for password hashing.
pub const BCRYPT_COST: u32 = 10;

/// Validate email syntax: one `@`, no whitespace, a dot in the domain part.
pub fn validate_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Validate a username: 3–30 chars after trimming, and free of
/// markup-significant characters so stored names are safe to render.
pub fn validate_username(username: &str) -> bool {
    let len = username.chars().count();
    if !(3..=30).contains(&len) {
        return false;
    }
    !username.contains(['<', '>', '&', '"', '\''])
}
