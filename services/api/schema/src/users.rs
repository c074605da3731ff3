use sea_orm::entity::prelude::*;

/// Account record. The unique index on `email` is the final arbiter when
/// two signups race: the loser's insert fails and surfaces as a conflict.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    /// bcrypt hash. Never serialized to clients.
    pub password_hash: String,
    pub verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::quote_lists::Entity")]
    QuoteLists,
}

impl Related<super::quote_lists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuoteLists.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
