use sea_orm_migration::prelude::*;

/// One row per (post, user); `vote` is 1 or -1.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Votes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Votes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Votes::PostId).big_integer().not_null())
                    .col(ColumnDef::new(Votes::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Votes::Vote)
                            .small_integer()
                            .not_null()
                            .check(Expr::col(Votes::Vote).is_in([1, -1])),
                    )
                    .col(
                        ColumnDef::new(Votes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_votes_post_user")
                    .table(Votes::Table)
                    .col(Votes::PostId)
                    .col(Votes::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Votes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Votes {
    Table,
    Id,
    PostId,
    UserId,
    Vote,
    CreatedAt,
}
