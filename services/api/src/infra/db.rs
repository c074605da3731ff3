use std::collections::HashMap;

use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection,
    DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    SqlErr, TransactionTrait,
    sea_query::{Expr, extension::postgres::PgExpr},
};
use uuid::Uuid;

use quotelist_api_schema::{quote_lists, quotes, users};
use quotelist_core::pagination::PageRequest;

use crate::domain::repository::{QuoteListRepository, UserRepository};
use crate::domain::types::{Quote, QuoteList, User};
use crate::error::ApiError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            verified: Set(user.verified),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| match e.sql_err() {
            // Unique index on email: the losing side of a concurrent signup
            // lands here instead of corrupting state.
            Some(SqlErr::UniqueConstraintViolation(_)) => ApiError::EmailTaken,
            _ => ApiError::Internal(anyhow::Error::new(e).context("create user")),
        })?;
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            verified: Set(true),
            updated_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark user verified")?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .all(&self.db)
            .await
            .context("list all users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        verified: model.verified,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── QuoteList repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbQuoteListRepository {
    pub db: DatabaseConnection,
}

impl QuoteListRepository for DbQuoteListRepository {
    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, ApiError> {
        let count = quote_lists::Entity::find()
            .filter(quote_lists::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .context("count quote lists by user")?;
        Ok(count)
    }

    async fn create(&self, list: &QuoteList) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let list = list.clone();
                Box::pin(async move {
                    list_active_model(&list).insert(txn).await?;
                    insert_quotes(txn, list.id, &list.quotes).await
                })
            })
            .await
            .context("create quote list")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<QuoteList>, ApiError> {
        let Some(model) = quote_lists::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find quote list by id")?
        else {
            return Ok(None);
        };

        let quote_models = quotes::Entity::find()
            .filter(quotes::Column::QuoteListId.eq(id))
            .order_by_asc(quotes::Column::Position)
            .all(&self.db)
            .await
            .context("load quotes for list")?;

        Ok(Some(list_from_models(model, quote_models)))
    }

    async fn update(&self, list: &QuoteList) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let list = list.clone();
                Box::pin(async move {
                    quote_lists::ActiveModel {
                        id: Set(list.id),
                        title: Set(list.title.clone()),
                        tags: Set(serde_json::json!(list.tags)),
                        is_pinned: Set(list.is_pinned),
                        updated_at: Set(list.updated_at),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    quotes::Entity::delete_many()
                        .filter(quotes::Column::QuoteListId.eq(list.id))
                        .exec(txn)
                        .await?;
                    insert_quotes(txn, list.id, &list.quotes).await
                })
            })
            .await
            .context("update quote list")?;
        Ok(())
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, ApiError> {
        // Quotes go with the list via the FK cascade.
        let result = quote_lists::Entity::delete_many()
            .filter(quote_lists::Column::Id.eq(id))
            .filter(quote_lists::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete quote list")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_page(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<QuoteList>, u64), ApiError> {
        let total = self.count_by_user(user_id).await?;

        let models = quote_lists::Entity::find()
            .filter(quote_lists::Column::UserId.eq(user_id))
            .order_by_desc(quote_lists::Column::CreatedAt)
            .offset(page.offset())
            .limit(u64::from(page.per_page))
            .all(&self.db)
            .await
            .context("list quote lists page")?;

        let lists = self.attach_quotes(models).await?;
        Ok((lists, total))
    }

    async fn find_pinned_by_user(&self, user_id: Uuid) -> Result<Vec<QuoteList>, ApiError> {
        let models = quote_lists::Entity::find()
            .filter(quote_lists::Column::UserId.eq(user_id))
            .filter(quote_lists::Column::IsPinned.eq(true))
            .all(&self.db)
            .await
            .context("find pinned quote lists")?;
        self.attach_quotes(models).await
    }

    async fn search(&self, user_id: Uuid, query: &str) -> Result<Vec<QuoteList>, ApiError> {
        let pattern = format!("%{}%", escape_like(query));
        let matching_ids: Vec<Uuid> = quotes::Entity::find()
            .select_only()
            .column(quotes::Column::QuoteListId)
            .distinct()
            .filter(
                Condition::any()
                    .add(Expr::col(quotes::Column::Quote).ilike(pattern.clone()))
                    .add(Expr::col(quotes::Column::Origin).ilike(pattern)),
            )
            .into_tuple()
            .all(&self.db)
            .await
            .context("search quotes")?;

        if matching_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = quote_lists::Entity::find()
            .filter(quote_lists::Column::UserId.eq(user_id))
            .filter(quote_lists::Column::Id.is_in(matching_ids))
            .order_by_desc(quote_lists::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("load matching quote lists")?;
        self.attach_quotes(models).await
    }
}

impl DbQuoteListRepository {
    /// Load the quotes for a batch of list models in one query, preserving
    /// the models' order.
    async fn attach_quotes(
        &self,
        models: Vec<quote_lists::Model>,
    ) -> Result<Vec<QuoteList>, ApiError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let quote_models = quotes::Entity::find()
            .filter(quotes::Column::QuoteListId.is_in(ids))
            .order_by_asc(quotes::Column::Position)
            .all(&self.db)
            .await
            .context("load quotes for lists")?;

        let mut by_list: HashMap<Uuid, Vec<quotes::Model>> = HashMap::new();
        for q in quote_models {
            by_list.entry(q.quote_list_id).or_default().push(q);
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let qs = by_list.remove(&m.id).unwrap_or_default();
                list_from_models(m, qs)
            })
            .collect())
    }
}

fn list_active_model(list: &QuoteList) -> quote_lists::ActiveModel {
    quote_lists::ActiveModel {
        id: Set(list.id),
        user_id: Set(list.user_id),
        title: Set(list.title.clone()),
        tags: Set(serde_json::json!(list.tags)),
        is_pinned: Set(list.is_pinned),
        created_at: Set(list.created_at),
        updated_at: Set(list.updated_at),
    }
}

async fn insert_quotes(
    txn: &DatabaseTransaction,
    list_id: Uuid,
    quotes_in: &[Quote],
) -> Result<(), sea_orm::DbErr> {
    if quotes_in.is_empty() {
        return Ok(());
    }
    let models = quotes_in.iter().enumerate().map(|(i, q)| quotes::ActiveModel {
        id: Set(q.id),
        quote_list_id: Set(list_id),
        quote: Set(q.quote.clone()),
        origin: Set(q.origin.clone()),
        position: Set(i as i32),
    });
    quotes::Entity::insert_many(models).exec(txn).await?;
    Ok(())
}

fn list_from_models(model: quote_lists::Model, quote_models: Vec<quotes::Model>) -> QuoteList {
    QuoteList {
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        tags: serde_json::from_value(model.tags).unwrap_or_default(),
        quotes: quote_models
            .into_iter()
            .map(|q| Quote {
                id: q.id,
                quote: q.quote,
                origin: q.origin,
            })
            .collect(),
        is_pinned: model.is_pinned,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
