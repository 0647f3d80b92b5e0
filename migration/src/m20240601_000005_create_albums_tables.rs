use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_users_table::Users;
use crate::m20240601_000004_create_assets_tables::Assets;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$
                BEGIN
                    IF NOT EXISTS (SELECT 1 FROM pg_type WHERE typname = 'album_user_role') THEN
                        CREATE TYPE album_user_role AS ENUM ('editor', 'viewer');
                    END IF;
                END$$;
                "#,
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Albums::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Albums::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Albums::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Albums::AlbumName).string_len(255).not_null())
                    .col(ColumnDef::new(Albums::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Albums::AlbumThumbnailAssetId).uuid())
                    .col(ColumnDef::new(Albums::SortOrder).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Albums::IsActivityEnabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Albums::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Albums::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Albums::UpdateId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_albums_owner")
                            .from(Albums::Table, Albums::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_albums_thumbnail_asset")
                            .from(Albums::Table, Albums::AlbumThumbnailAssetId)
                            .to(Assets::Table, Assets::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_albums_owner_update_id")
                    .table(Albums::Table)
                    .col(Albums::OwnerId)
                    .col(Albums::UpdateId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AlbumAssets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AlbumAssets::AlbumId).uuid().not_null())
                    .col(ColumnDef::new(AlbumAssets::AssetId).uuid().not_null())
                    .col(ColumnDef::new(AlbumAssets::UpdateId).uuid().not_null())
                    .col(
                        ColumnDef::new(AlbumAssets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(AlbumAssets::AlbumId)
                            .col(AlbumAssets::AssetId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_album_assets_album")
                            .from(AlbumAssets::Table, AlbumAssets::AlbumId)
                            .to(Albums::Table, Albums::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_album_assets_asset")
                            .from(AlbumAssets::Table, AlbumAssets::AssetId)
                            .to(Assets::Table, Assets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_album_assets_asset")
                    .table(AlbumAssets::Table)
                    .col(AlbumAssets::AssetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AlbumUsers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AlbumUsers::AlbumId).uuid().not_null())
                    .col(ColumnDef::new(AlbumUsers::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(AlbumUsers::Role)
                            .custom(Alias::new("album_user_role"))
                            .not_null()
                            .default(Expr::cust("'viewer'::album_user_role")),
                    )
                    .primary_key(
                        Index::create()
                            .col(AlbumUsers::AlbumId)
                            .col(AlbumUsers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_album_users_album")
                            .from(AlbumUsers::Table, AlbumUsers::AlbumId)
                            .to(Albums::Table, Albums::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_album_users_user")
                            .from(AlbumUsers::Table, AlbumUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_album_users_user")
                    .table(AlbumUsers::Table)
                    .col(AlbumUsers::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlbumUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AlbumAssets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Albums::Table).to_owned())
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS album_user_role;")
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Albums {
    Table,
    Id,
    OwnerId,
    AlbumName,
    Description,
    AlbumThumbnailAssetId,
    SortOrder,
    IsActivityEnabled,
    CreatedAt,
    UpdatedAt,
    UpdateId,
}

#[derive(DeriveIden)]
pub enum AlbumAssets {
    Table,
    AlbumId,
    AssetId,
    UpdateId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum AlbumUsers {
    Table,
    AlbumId,
    UserId,
    Role,
}
