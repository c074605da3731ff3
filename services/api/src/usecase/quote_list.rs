use chrono::Utc;
use uuid::Uuid;

use quotelist_core::pagination::PageRequest;

use crate::domain::repository::{QuoteGenerator, QuoteListRepository};
use crate::domain::types::{
    GeneratedQuote, MAX_QUOTE_LISTS, MAX_QUOTES, MAX_TAGS, Quote, QuoteList,
};
use crate::error::ApiError;

/// Incoming quote payload (create/edit/add-quote bodies).
#[derive(Debug, Clone)]
pub struct QuoteInput {
    pub quote: String,
    pub origin: String,
}

fn quotes_from_inputs(inputs: Vec<QuoteInput>) -> Vec<Quote> {
    inputs
        .into_iter()
        .map(|q| Quote {
            id: Uuid::now_v7(),
            quote: q.quote,
            origin: q.origin,
        })
        .collect()
}

fn check_caps(tags: Option<&[String]>, quotes_len: Option<usize>) -> Result<(), ApiError> {
    if tags.is_some_and(|t| t.len() > MAX_TAGS) {
        return Err(ApiError::TooManyTags);
    }
    if quotes_len.is_some_and(|n| n > MAX_QUOTES) {
        return Err(ApiError::TooManyQuotes);
    }
    Ok(())
}

/// Load a list and check the caller owns it.
async fn find_owned<R: QuoteListRepository>(
    repo: &R,
    list_id: Uuid,
    user_id: Uuid,
) -> Result<QuoteList, ApiError> {
    let list = repo
        .find_by_id(list_id)
        .await?
        .ok_or(ApiError::ListNotFound)?;
    if list.user_id != user_id {
        return Err(ApiError::NotListOwner);
    }
    Ok(list)
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreateQuoteListInput {
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub quotes: Option<Vec<QuoteInput>>,
}

pub struct CreateQuoteListUseCase<R: QuoteListRepository> {
    pub repo: R,
}

impl<R: QuoteListRepository> CreateQuoteListUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: CreateQuoteListInput,
    ) -> Result<QuoteList, ApiError> {
        let title = input
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(ApiError::TitleRequired)?;
        check_caps(
            input.tags.as_deref(),
            input.quotes.as_ref().map(Vec::len),
        )?;

        if self.repo.count_by_user(user_id).await? >= MAX_QUOTE_LISTS {
            return Err(ApiError::TooManyLists);
        }

        let now = Utc::now();
        let list = QuoteList {
            id: Uuid::now_v7(),
            user_id,
            title,
            tags: input.tags.unwrap_or_default(),
            quotes: quotes_from_inputs(input.quotes.unwrap_or_default()),
            is_pinned: false,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&list).await?;
        Ok(list)
    }
}

// ── Edit ─────────────────────────────────────────────────────────────────────

pub struct EditQuoteListInput {
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub quotes: Option<Vec<QuoteInput>>,
}

pub struct EditQuoteListUseCase<R: QuoteListRepository> {
    pub repo: R,
}

impl<R: QuoteListRepository> EditQuoteListUseCase<R> {
    /// Replaces only the provided fields; a provided `quotes` array replaces
    /// the list's quotes wholesale.
    pub async fn execute(
        &self,
        user_id: Uuid,
        list_id: Uuid,
        input: EditQuoteListInput,
    ) -> Result<QuoteList, ApiError> {
        let mut list = find_owned(&self.repo, list_id, user_id).await?;
        check_caps(
            input.tags.as_deref(),
            input.quotes.as_ref().map(Vec::len),
        )?;

        if let Some(title) = input.title {
            list.title = title;
        }
        if let Some(tags) = input.tags {
            list.tags = tags;
        }
        if let Some(quotes) = input.quotes {
            list.quotes = quotes_from_inputs(quotes);
        }
        list.updated_at = Utc::now();

        self.repo.update(&list).await?;
        Ok(list)
    }
}

// ── Pin / unpin ──────────────────────────────────────────────────────────────

pub struct SetPinnedUseCase<R: QuoteListRepository> {
    pub repo: R,
}

impl<R: QuoteListRepository> SetPinnedUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        list_id: Uuid,
        is_pinned: bool,
    ) -> Result<QuoteList, ApiError> {
        let mut list = find_owned(&self.repo, list_id, user_id).await?;
        list.is_pinned = is_pinned;
        list.updated_at = Utc::now();
        self.repo.update(&list).await?;
        Ok(list)
    }
}

// ── List (paginated) ─────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct QuoteListPage {
    pub lists: Vec<QuoteList>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

pub struct ListQuoteListsUseCase<R: QuoteListRepository> {
    pub repo: R,
}

impl<R: QuoteListRepository> ListQuoteListsUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<QuoteListPage, ApiError> {
        let page = page.clamped();
        let (lists, total) = self.repo.list_page(user_id, page).await?;
        Ok(QuoteListPage {
            lists,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }
}

// ── Delete ───────────────────────────────────────────────────────────────────

pub struct DeleteQuoteListUseCase<R: QuoteListRepository> {
    pub repo: R,
}

impl<R: QuoteListRepository> DeleteQuoteListUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, list_id: Uuid) -> Result<(), ApiError> {
        // Owner-scoped delete: a missing list and someone else's list are
        // indistinguishable to the caller.
        if !self.repo.delete_owned(list_id, user_id).await? {
            return Err(ApiError::ListNotFoundOrUnauthorized);
        }
        Ok(())
    }
}

// ── Add a quote ──────────────────────────────────────────────────────────────

pub struct AddQuoteInput {
    pub quote: Option<String>,
    pub origin: Option<String>,
}

pub struct AddQuoteUseCase<R: QuoteListRepository> {
    pub repo: R,
}

impl<R: QuoteListRepository> AddQuoteUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        list_id: Uuid,
        input: AddQuoteInput,
    ) -> Result<QuoteList, ApiError> {
        let (Some(quote), Some(origin)) = (input.quote, input.origin) else {
            return Err(ApiError::QuoteFieldsRequired);
        };
        if quote.trim().is_empty() || origin.trim().is_empty() {
            return Err(ApiError::QuoteFieldsRequired);
        }

        let mut list = find_owned(&self.repo, list_id, user_id).await?;
        if list.quotes.len() >= MAX_QUOTES {
            return Err(ApiError::TooManyQuotes);
        }
        list.quotes.push(Quote {
            id: Uuid::now_v7(),
            quote,
            origin,
        });
        list.updated_at = Utc::now();

        self.repo.update(&list).await?;
        Ok(list)
    }
}

// ── Remove a quote ───────────────────────────────────────────────────────────

pub struct RemoveQuoteUseCase<R: QuoteListRepository> {
    pub repo: R,
}

impl<R: QuoteListRepository> RemoveQuoteUseCase<R> {
    /// An unknown quote id leaves the list unchanged (the write still
    /// happens), matching the filter-and-save reference behavior.
    pub async fn execute(
        &self,
        user_id: Uuid,
        list_id: Uuid,
        quote_id: Uuid,
    ) -> Result<QuoteList, ApiError> {
        let mut list = find_owned(&self.repo, list_id, user_id).await?;
        list.quotes.retain(|q| q.id != quote_id);
        list.updated_at = Utc::now();
        self.repo.update(&list).await?;
        Ok(list)
    }
}

// ── Search ───────────────────────────────────────────────────────────────────

pub struct SearchQuoteListsUseCase<R: QuoteListRepository> {
    pub repo: R,
}

impl<R: QuoteListRepository> SearchQuoteListsUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        query: Option<String>,
    ) -> Result<Vec<QuoteList>, ApiError> {
        let query = query
            .filter(|q| !q.trim().is_empty())
            .ok_or(ApiError::SearchQueryRequired)?;
        let lists = self.repo.search(user_id, query.trim()).await?;
        if lists.is_empty() {
            return Err(ApiError::NoSearchMatches);
        }
        Ok(lists)
    }
}

// ── Generate candidate quotes ────────────────────────────────────────────────

pub struct GenerateQuotesUseCase<G: QuoteGenerator> {
    pub generator: G,
}

impl<G: QuoteGenerator> GenerateQuotesUseCase<G> {
    pub async fn execute(
        &self,
        tags: Option<Vec<String>>,
    ) -> Result<Vec<GeneratedQuote>, ApiError> {
        let tags = tags.filter(|t| !t.is_empty()).ok_or(ApiError::TagsRequired)?;
        self.generator.generate(&tags).await
    }
}
