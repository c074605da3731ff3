use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Quotes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Quotes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Quotes::QuoteListId).uuid().not_null())
                    .col(ColumnDef::new(Quotes::Quote).text().not_null())
                    .col(ColumnDef::new(Quotes::Origin).text().not_null())
                    .col(ColumnDef::new(Quotes::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Quotes::Table, Quotes::QuoteListId)
                            .to(QuoteLists::Table, QuoteLists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Quotes::Table)
                    .col(Quotes::QuoteListId)
                    .name("idx_quotes_quote_list_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Quotes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Quotes {
    Table,
    Id,
    QuoteListId,
    Quote,
    Origin,
    Position,
}

#[derive(Iden)]
enum QuoteLists {
    Table,
    Id,
}
