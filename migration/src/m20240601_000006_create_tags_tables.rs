use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_users_table::Users;
use crate::m20240601_000004_create_assets_tables::Assets;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tags::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tags::UserId).uuid().not_null())
                    // slash-delimited path, e.g. "animals/dog"
                    .col(ColumnDef::new(Tags::Value).string_len(1024).not_null())
                    .col(ColumnDef::new(Tags::Color).string_len(16))
                    .col(ColumnDef::new(Tags::ParentId).uuid())
                    .col(
                        ColumnDef::new(Tags::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tags_user")
                            .from(Tags::Table, Tags::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tags_parent")
                            .from(Tags::Table, Tags::ParentId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tags_user_value")
                    .table(Tags::Table)
                    .col(Tags::UserId)
                    .col(Tags::Value)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TagAssets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TagAssets::TagId).uuid().not_null())
                    .col(ColumnDef::new(TagAssets::AssetId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(TagAssets::TagId)
                            .col(TagAssets::AssetId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tag_assets_tag")
                            .from(TagAssets::Table, TagAssets::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tag_assets_asset")
                            .from(TagAssets::Table, TagAssets::AssetId)
                            .to(Assets::Table, Assets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tag_assets_asset")
                    .table(TagAssets::Table)
                    .col(TagAssets::AssetId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TagAssets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Tags {
    Table,
    Id,
    UserId,
    Value,
    Color,
    ParentId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum TagAssets {
    Table,
    TagId,
    AssetId,
}
