//! Create badge table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Badge::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Badge::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Badge::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Badge::BadgeType).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Badge::AwardedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_badge_user")
                            .from(Badge::Table, Badge::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, badge_type) — a badge type is granted once
        manager
            .create_index(
                Index::create()
                    .name("idx_badge_user_type")
                    .table(Badge::Table)
                    .col(Badge::UserId)
                    .col(Badge::BadgeType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Badge::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Badge {
    Table,
    Id,
    UserId,
    BadgeType,
    AwardedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
