#![allow(async_fn_in_trait)]

use uuid::Uuid;

use quotelist_core::pagination::PageRequest;

use crate::domain::types::{GeneratedQuote, QuoteList, User};
use crate::error::ApiError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    /// Insert a new user. The store's unique-email constraint is the final
    /// arbiter under concurrent signups: a violation surfaces as
    /// [`ApiError::EmailTaken`], never as corrupt state.
    async fn create(&self, user: &User) -> Result<(), ApiError>;

    /// Flip the verified flag. A user transitions to verified exactly once;
    /// re-verification is a no-op at the store level.
    async fn mark_verified(&self, id: Uuid) -> Result<(), ApiError>;

    /// All users, for the daily digest sweep.
    async fn list_all(&self) -> Result<Vec<User>, ApiError>;
}

/// Repository for quote lists and their quotes.
pub trait QuoteListRepository: Send + Sync {
    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, ApiError>;

    async fn create(&self, list: &QuoteList) -> Result<(), ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<QuoteList>, ApiError>;

    /// Full write-back: list metadata plus wholesale quote replacement.
    async fn update(&self, list: &QuoteList) -> Result<(), ApiError>;

    /// Delete a list only if `user_id` owns it. Returns `true` if a row was
    /// deleted.
    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, ApiError>;

    /// One page of the user's lists, newest first, plus the total count.
    async fn list_page(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<QuoteList>, u64), ApiError>;

    async fn find_pinned_by_user(&self, user_id: Uuid) -> Result<Vec<QuoteList>, ApiError>;

    /// Lists owned by `user_id` containing a quote whose text or origin
    /// matches `query` case-insensitively.
    async fn search(&self, user_id: Uuid, query: &str) -> Result<Vec<QuoteList>, ApiError>;
}

/// Outbound email transport.
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<(), ApiError>;
}

/// Generative-AI collaborator proposing quotes for a tag set.
pub trait QuoteGenerator: Send + Sync {
    async fn generate(&self, tags: &[String]) -> Result<Vec<GeneratedQuote>, ApiError>;
}
