//! Create attachment table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attachment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attachment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attachment::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Attachment::Name).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Attachment::ContentType)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attachment::Size).big_integer().not_null())
                    .col(ColumnDef::new(Attachment::Url).string_len(512).not_null())
                    .col(
                        ColumnDef::new(Attachment::StorageKey)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attachment::Md5).string_len(32).not_null())
                    .col(ColumnDef::new(Attachment::Width).integer())
                    .col(ColumnDef::new(Attachment::Height).integer())
                    .col(
                        ColumnDef::new(Attachment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attachment_user")
                            .from(Attachment::Table, Attachment::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id
        manager
            .create_index(
                Index::create()
                    .name("idx_attachment_user_id")
                    .table(Attachment::Table)
                    .col(Attachment::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: (md5, user_id) (for upload dedup)
        manager
            .create_index(
                Index::create()
                    .name("idx_attachment_md5_user")
                    .table(Attachment::Table)
                    .col(Attachment::Md5)
                    .col(Attachment::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attachment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Attachment {
    Table,
    Id,
    UserId,
    Name,
    ContentType,
    Size,
    Url,
    StorageKey,
    Md5,
    Width,
    Height,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
