use sea_orm::entity::prelude::*;

/// A single quote within a list. `position` preserves the list's display
/// order across replacements.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "quotes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub quote_list_id: Uuid,
    pub quote: String,
    pub origin: String,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quote_lists::Entity",
        from = "Column::QuoteListId",
        to = "super::quote_lists::Column::Id"
    )]
    QuoteLists,
}

impl Related<super::quote_lists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuoteLists.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
