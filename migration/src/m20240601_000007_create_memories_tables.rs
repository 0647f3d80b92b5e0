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
                    .table(Memories::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Memories::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Memories::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Memories::Type).string_len(64).not_null())
                    .col(ColumnDef::new(Memories::Data).json().not_null())
                    .col(ColumnDef::new(Memories::IsSaved).boolean().not_null().default(false))
                    .col(ColumnDef::new(Memories::MemoryAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Memories::SeenAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Memories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Memories::UpdateId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_memories_owner")
                            .from(Memories::Table, Memories::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_memories_owner_update_id")
                    .table(Memories::Table)
                    .col(Memories::OwnerId)
                    .col(Memories::UpdateId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MemoryAssets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MemoryAssets::MemoriesId).uuid().not_null())
                    .col(ColumnDef::new(MemoryAssets::AssetId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(MemoryAssets::MemoriesId)
                            .col(MemoryAssets::AssetId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_memory_assets_memory")
                            .from(MemoryAssets::Table, MemoryAssets::MemoriesId)
                            .to(Memories::Table, Memories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_memory_assets_asset")
                            .from(MemoryAssets::Table, MemoryAssets::AssetId)
                            .to(Assets::Table, Assets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MemoryAssets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Memories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Memories {
    Table,
    Id,
    OwnerId,
    Type,
    Data,
    IsSaved,
    MemoryAt,
    SeenAt,
    CreatedAt,
    UpdateId,
}

#[derive(DeriveIden)]
pub enum MemoryAssets {
    Table,
    MemoriesId,
    AssetId,
}
