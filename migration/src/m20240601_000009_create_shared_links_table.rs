use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_users_table::Users;
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
                    .table(SharedLinks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SharedLinks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SharedLinks::UserId).uuid().not_null())
                    .col(ColumnDef::new(SharedLinks::Key).binary_len(50).not_null())
                    .col(ColumnDef::new(SharedLinks::Slug).string_len(255))
                    .col(ColumnDef::new(SharedLinks::ExpiresAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(SharedLinks::Password).string_len(255))
                    .col(ColumnDef::new(SharedLinks::ShowExif).boolean().not_null().default(true))
                    .col(ColumnDef::new(SharedLinks::AllowUpload).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(SharedLinks::AllowDownload)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(SharedLinks::AlbumId).uuid())
                    .col(
                        ColumnDef::new(SharedLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shared_links_user")
                            .from(SharedLinks::Table, SharedLinks::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shared_links_album")
                            .from(SharedLinks::Table, SharedLinks::AlbumId)
                            .to(Albums::Table, Albums::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shared_links_key")
                    .table(SharedLinks::Table)
                    .col(SharedLinks::Key)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_shared_links_slug")
                    .table(SharedLinks::Table)
                    .col(SharedLinks::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Only populated when album_id IS NULL (invariant 7: exactly one of
        // album_id / asset set is populated). Enforced at the service layer,
        // not by a check constraint, since asset membership is a separate table.
        manager
            .create_table(
                Table::create()
                    .table(SharedLinkAssets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SharedLinkAssets::SharedLinkId).uuid().not_null())
                    .col(ColumnDef::new(SharedLinkAssets::AssetId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(SharedLinkAssets::SharedLinkId)
                            .col(SharedLinkAssets::AssetId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shared_link_assets_link")
                            .from(SharedLinkAssets::Table, SharedLinkAssets::SharedLinkId)
                            .to(SharedLinks::Table, SharedLinks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shared_link_assets_asset")
                            .from(SharedLinkAssets::Table, SharedLinkAssets::AssetId)
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
            .drop_table(Table::drop().table(SharedLinkAssets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SharedLinks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SharedLinks {
    Table,
    Id,
    UserId,
    Key,
    Slug,
    ExpiresAt,
    Password,
    ShowExif,
    AllowUpload,
    AllowDownload,
    AlbumId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum SharedLinkAssets {
    Table,
    SharedLinkId,
    AssetId,
}
