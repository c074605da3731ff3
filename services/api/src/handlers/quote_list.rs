use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quotelist_core::pagination::PageRequest;

use crate::domain::types::{GeneratedQuote, Quote, QuoteList};
use crate::error::ApiError;
use crate::handlers::auth::MessageResponse;
use crate::identity::SessionIdentity;
use crate::state::AppState;
use crate::usecase::quote_list::{
    AddQuoteInput, AddQuoteUseCase, CreateQuoteListInput, CreateQuoteListUseCase,
    DeleteQuoteListUseCase, EditQuoteListInput, EditQuoteListUseCase, GenerateQuotesUseCase,
    ListQuoteListsUseCase, QuoteInput, RemoveQuoteUseCase, SearchQuoteListsUseCase,
    SetPinnedUseCase,
};

/// Page size of `GET /api/quotes/all`.
const LISTS_PER_PAGE: u32 = 10;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct QuoteResponse {
    pub id: String,
    pub quote: String,
    pub origin: String,
}

impl From<Quote> for QuoteResponse {
    fn from(q: Quote) -> Self {
        Self {
            id: q.id.to_string(),
            quote: q.quote,
            origin: q.origin,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteListResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub tags: Vec<String>,
    pub quotes: Vec<QuoteResponse>,
    pub is_pinned: bool,
    #[serde(serialize_with = "quotelist_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "quotelist_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<QuoteList> for QuoteListResponse {
    fn from(list: QuoteList) -> Self {
        Self {
            id: list.id.to_string(),
            user_id: list.user_id.to_string(),
            title: list.title,
            tags: list.tags,
            quotes: list.quotes.into_iter().map(QuoteResponse::from).collect(),
            is_pinned: list.is_pinned,
            created_at: list.created_at,
            updated_at: list.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct SingleListResponse {
    pub success: bool,
    pub message: String,
    pub list: QuoteListResponse,
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct QuoteBody {
    pub quote: String,
    pub origin: String,
}

impl From<QuoteBody> for QuoteInput {
    fn from(q: QuoteBody) -> Self {
        Self {
            quote: q.quote,
            origin: q.origin,
        }
    }
}

#[derive(Deserialize)]
pub struct UpsertListRequest {
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub quotes: Option<Vec<QuoteBody>>,
}

// ── POST /api/quotes/add ─────────────────────────────────────────────────────

pub async fn add_quote_list(
    identity: SessionIdentity,
    State(state): State<AppState>,
    Json(body): Json<UpsertListRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = CreateQuoteListUseCase {
        repo: state.quote_list_repo(),
    };
    let list = usecase
        .execute(
            identity.user_id,
            CreateQuoteListInput {
                title: body.title,
                tags: body.tags,
                quotes: body
                    .quotes
                    .map(|qs| qs.into_iter().map(QuoteInput::from).collect()),
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SingleListResponse {
            success: true,
            message: "Quote list created successfully".to_owned(),
            list: list.into(),
        }),
    ))
}

// ── POST /api/quotes/generate ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GenerateRequest {
    pub tags: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub quotes: Vec<GeneratedQuote>,
}

pub async fn generate_quotes(
    _identity: SessionIdentity,
    State(state): State<AppState>,
    Json(body): Json<GenerateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = GenerateQuotesUseCase {
        generator: state.quote_generator(),
    };
    let quotes = usecase.execute(body.tags).await?;

    Ok((
        StatusCode::OK,
        Json(GenerateResponse {
            success: true,
            quotes,
        }),
    ))
}

// ── PUT /api/quotes/edit/{list_id} ───────────────────────────────────────────

pub async fn edit_quote_list(
    identity: SessionIdentity,
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    Json(body): Json<UpsertListRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = EditQuoteListUseCase {
        repo: state.quote_list_repo(),
    };
    let list = usecase
        .execute(
            identity.user_id,
            list_id,
            EditQuoteListInput {
                title: body.title,
                tags: body.tags,
                quotes: body
                    .quotes
                    .map(|qs| qs.into_iter().map(QuoteInput::from).collect()),
            },
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(SingleListResponse {
            success: true,
            message: "Quote list updated successfully".to_owned(),
            list: list.into(),
        }),
    ))
}

// ── GET /api/quotes/all ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AllListsQuery {
    pub page: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllListsResponse {
    pub success: bool,
    pub message: String,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub total_lists: u64,
    pub lists: Vec<QuoteListResponse>,
}

pub async fn get_all_quote_lists(
    identity: SessionIdentity,
    State(state): State<AppState>,
    Query(query): Query<AllListsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = ListQuoteListsUseCase {
        repo: state.quote_list_repo(),
    };
    let page = usecase
        .execute(
            identity.user_id,
            PageRequest {
                per_page: LISTS_PER_PAGE,
                page: query.page.unwrap_or(1),
            },
        )
        .await?;

    let total_pages = page.total.div_ceil(u64::from(page.per_page));
    Ok((
        StatusCode::OK,
        Json(AllListsResponse {
            success: true,
            message: "Paginated quote lists retrieved successfully".to_owned(),
            page: page.page,
            limit: page.per_page,
            total_pages,
            total_lists: page.total,
            lists: page.lists.into_iter().map(QuoteListResponse::from).collect(),
        }),
    ))
}

// ── PUT /api/quotes/update-quote-pinned/{list_id} ────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPinnedRequest {
    pub is_pinned: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPinnedResponse {
    pub success: bool,
    pub message: String,
    pub quote_list: QuoteListResponse,
}

pub async fn update_quote_list_pinned(
    identity: SessionIdentity,
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    Json(body): Json<SetPinnedRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = SetPinnedUseCase {
        repo: state.quote_list_repo(),
    };
    let list = usecase
        .execute(identity.user_id, list_id, body.is_pinned)
        .await?;

    Ok((
        StatusCode::OK,
        Json(SetPinnedResponse {
            success: true,
            message: "Quote list updated successfully".to_owned(),
            quote_list: list.into(),
        }),
    ))
}

// ── DELETE /api/quotes/delete/{id} ───────────────────────────────────────────

pub async fn delete_quote_list(
    identity: SessionIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = DeleteQuoteListUseCase {
        repo: state.quote_list_repo(),
    };
    usecase.execute(identity.user_id, id).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            success: true,
            message: "Quote list deleted successfully".to_owned(),
        }),
    ))
}

// ── POST /api/quotes/{list_id}/add-quote ─────────────────────────────────────

#[derive(Deserialize)]
pub struct AddQuoteRequest {
    pub quote: Option<String>,
    pub origin: Option<String>,
}

pub async fn add_quote_to_list(
    identity: SessionIdentity,
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    Json(body): Json<AddQuoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = AddQuoteUseCase {
        repo: state.quote_list_repo(),
    };
    let list = usecase
        .execute(
            identity.user_id,
            list_id,
            AddQuoteInput {
                quote: body.quote,
                origin: body.origin,
            },
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(SingleListResponse {
            success: true,
            message: "Quote added successfully".to_owned(),
            list: list.into(),
        }),
    ))
}

// ── DELETE /api/quotes/{list_id}/delete-quote/{quote_id} ─────────────────────

pub async fn delete_quote_from_list(
    identity: SessionIdentity,
    State(state): State<AppState>,
    Path((list_id, quote_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = RemoveQuoteUseCase {
        repo: state.quote_list_repo(),
    };
    let list = usecase.execute(identity.user_id, list_id, quote_id).await?;

    Ok((
        StatusCode::OK,
        Json(SingleListResponse {
            success: true,
            message: "Quote deleted successfully".to_owned(),
            list: list.into(),
        }),
    ))
}

// ── GET /api/quotes/search ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub message: String,
    pub lists: Vec<QuoteListResponse>,
}

pub async fn search_quote_lists(
    identity: SessionIdentity,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = SearchQuoteListsUseCase {
        repo: state.quote_list_repo(),
    };
    let lists = usecase.execute(identity.user_id, query.query).await?;

    Ok((
        StatusCode::OK,
        Json(SearchResponse {
            success: true,
            message: "Quote lists matching the search query retrieved successfully".to_owned(),
            lists: lists.into_iter().map(QuoteListResponse::from).collect(),
        }),
    ))
}
