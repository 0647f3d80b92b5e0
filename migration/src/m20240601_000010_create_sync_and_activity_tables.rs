use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_users_table::Users;
use crate::m20240601_000002_create_sessions_and_api_keys::Sessions;
use crate::m20240601_000004_create_assets_tables::Assets;
use crate::m20240601_000005_create_albums_tables::Albums;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SessionSyncCheckpoints::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SessionSyncCheckpoints::SessionId).uuid().not_null())
                    // SyncEntityType discriminant, e.g. "AssetsV1"
                    .col(ColumnDef::new(SessionSyncCheckpoints::Type).string_len(64).not_null())
                    .col(ColumnDef::new(SessionSyncCheckpoints::Ack).string_len(64).not_null())
                    .col(ColumnDef::new(SessionSyncCheckpoints::UpdateId).uuid().not_null())
                    .col(
                        ColumnDef::new(SessionSyncCheckpoints::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(SessionSyncCheckpoints::SessionId)
                            .col(SessionSyncCheckpoints::Type),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_sync_checkpoints_session")
                            .from(SessionSyncCheckpoints::Table, SessionSyncCheckpoints::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Activities::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Activities::UserId).uuid().not_null())
                    .col(ColumnDef::new(Activities::AlbumId).uuid().not_null())
                    .col(ColumnDef::new(Activities::AssetId).uuid())
                    .col(ColumnDef::new(Activities::IsLiked).boolean().not_null().default(false))
                    .col(ColumnDef::new(Activities::Comment).text())
                    .col(
                        ColumnDef::new(Activities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activities_user")
                            .from(Activities::Table, Activities::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activities_album")
                            .from(Activities::Table, Activities::AlbumId)
                            .to(Albums::Table, Albums::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activities_asset")
                            .from(Activities::Table, Activities::AssetId)
                            .to(Assets::Table, Assets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activities_album")
                    .table(Activities::Table)
                    .col(Activities::AlbumId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SystemMetadata::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SystemMetadata::Key).string_len(255).not_null().primary_key())
                    .col(ColumnDef::new(SystemMetadata::Value).json().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SystemMetadata::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SessionSyncCheckpoints::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SessionSyncCheckpoints {
    Table,
    SessionId,
    Type,
    Ack,
    UpdateId,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Activities {
    Table,
    Id,
    UserId,
    AlbumId,
    AssetId,
    IsLiked,
    Comment,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum SystemMetadata {
    Table,
    Key,
    Value,
}
