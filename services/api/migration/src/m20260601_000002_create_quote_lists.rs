use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QuoteLists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuoteLists::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuoteLists::UserId).uuid().not_null())
                    .col(ColumnDef::new(QuoteLists::Title).string().not_null())
                    .col(ColumnDef::new(QuoteLists::Tags).json_binary().not_null())
                    .col(
                        ColumnDef::new(QuoteLists::IsPinned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(QuoteLists::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuoteLists::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuoteLists::Table, QuoteLists::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(QuoteLists::Table)
                    .col(QuoteLists::UserId)
                    .name("idx_quote_lists_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuoteLists::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum QuoteLists {
    Table,
    Id,
    UserId,
    Title,
    Tags,
    IsPinned,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
