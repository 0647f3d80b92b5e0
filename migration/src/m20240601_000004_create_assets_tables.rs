use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_users_table::Users;
use crate::m20240601_000003_create_stacks_table::Stacks;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared(
            r#"
            DO $$
            BEGIN
                IF NOT EXISTS (SELECT 1 FROM pg_type WHERE typname = 'asset_type') THEN
                    CREATE TYPE asset_type AS ENUM ('image', 'video', 'audio', 'other');
                END IF;
                IF NOT EXISTS (SELECT 1 FROM pg_type WHERE typname = 'asset_visibility') THEN
                    CREATE TYPE asset_visibility AS ENUM ('timeline', 'archive', 'hidden', 'locked');
                END IF;
                IF NOT EXISTS (SELECT 1 FROM pg_type WHERE typname = 'asset_status') THEN
                    CREATE TYPE asset_status AS ENUM ('active', 'trashed', 'deleted');
                END IF;
                IF NOT EXISTS (SELECT 1 FROM pg_type WHERE typname = 'asset_file_type') THEN
                    CREATE TYPE asset_file_type AS ENUM ('fullsize', 'preview', 'thumbnail', 'sidecar');
                END IF;
            END$$;
            "#,
        )
        .await?;

        // Every mutable row here carries `update_id`, a time-ordered 128-bit id
        // (see shared::ids) used as the sync watermark. It is NOT the row's
        // primary key and is reassigned on every write that should be visible
        // to an incremental sync client.
        manager
            .create_table(
                Table::create()
                    .table(Assets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Assets::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Assets::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Assets::LibraryId).uuid())
                    .col(ColumnDef::new(Assets::Checksum).binary_len(20).not_null())
                    .col(ColumnDef::new(Assets::OriginalPath).string_len(1024).not_null())
                    .col(ColumnDef::new(Assets::OriginalFileName).string_len(1024).not_null())
                    .col(ColumnDef::new(Assets::DeviceAssetId).string_len(255).not_null())
                    .col(ColumnDef::new(Assets::DeviceId).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Assets::Type)
                            .custom(Alias::new("asset_type"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assets::Visibility)
                            .custom(Alias::new("asset_visibility"))
                            .not_null()
                            .default(Expr::cust("'timeline'::asset_visibility")),
                    )
                    .col(
                        ColumnDef::new(Assets::IsFavorite)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Assets::FileCreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Assets::FileModifiedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Assets::LocalDateTime).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Assets::FileSizeInByte).big_integer().not_null())
                    .col(ColumnDef::new(Assets::DurationInSeconds).double_null())
                    .col(ColumnDef::new(Assets::Width).integer())
                    .col(ColumnDef::new(Assets::Height).integer())
                    .col(ColumnDef::new(Assets::Thumbhash).binary())
                    .col(ColumnDef::new(Assets::LivePhotoVideoId).uuid())
                    .col(ColumnDef::new(Assets::StackId).uuid())
                    .col(
                        ColumnDef::new(Assets::Status)
                            .custom(Alias::new("asset_status"))
                            .not_null()
                            .default(Expr::cust("'active'::asset_status")),
                    )
                    .col(ColumnDef::new(Assets::DeletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Assets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Assets::UpdateId).uuid().not_null())
                    .col(
                        ColumnDef::new(Assets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assets_owner")
                            .from(Assets::Table, Assets::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assets_stack")
                            .from(Assets::Table, Assets::StackId)
                            .to(Stacks::Table, Stacks::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assets_live_photo_video")
                            .from(Assets::Table, Assets::LivePhotoVideoId)
                            .to(Assets::Table, Assets::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Enforces invariant 1 (content uniqueness per owner): at most one
        // non-deleted asset per (owner, library, checksum). library_id is
        // nullable, so the constraint is scoped with a partial index rather
        // than a table-level UNIQUE (NULLs would otherwise compare distinct
        // and defeat the intent when library_id is absent).
        conn.execute_unprepared(
            r#"
            CREATE UNIQUE INDEX idx_assets_owner_library_checksum
            ON assets (owner_id, COALESCE(library_id, '00000000-0000-0000-0000-000000000000'::uuid), checksum)
            WHERE status != 'deleted';
            "#,
        )
        .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assets_update_id")
                    .table(Assets::Table)
                    .col(Assets::UpdateId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_assets_owner_update_id")
                    .table(Assets::Table)
                    .col(Assets::OwnerId)
                    .col(Assets::UpdateId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_assets_device_asset")
                    .table(Assets::Table)
                    .col(Assets::OwnerId)
                    .col(Assets::DeviceId)
                    .col(Assets::DeviceAssetId)
                    .to_owned(),
            )
            .await?;
        // Supports timeline month bucketing (§4.7) which truncates local_date_time.
        manager
            .create_index(
                Index::create()
                    .name("idx_assets_owner_local_date_time")
                    .table(Assets::Table)
                    .col(Assets::OwnerId)
                    .col(Assets::LocalDateTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AssetExif::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AssetExif::AssetId).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AssetExif::Make).string_len(255))
                    .col(ColumnDef::new(AssetExif::Model).string_len(255))
                    .col(ColumnDef::new(AssetExif::ExifImageWidth).integer())
                    .col(ColumnDef::new(AssetExif::ExifImageHeight).integer())
                    .col(ColumnDef::new(AssetExif::Orientation).string_len(8))
                    .col(ColumnDef::new(AssetExif::DateTimeOriginal).timestamp_with_time_zone())
                    .col(ColumnDef::new(AssetExif::ModifyDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(AssetExif::TimeZone).string_len(64))
                    .col(ColumnDef::new(AssetExif::Latitude).double_null())
                    .col(ColumnDef::new(AssetExif::Longitude).double_null())
                    .col(ColumnDef::new(AssetExif::ProjectionType).string_len(32))
                    .col(ColumnDef::new(AssetExif::City).string_len(255))
                    .col(ColumnDef::new(AssetExif::State).string_len(255))
                    .col(ColumnDef::new(AssetExif::Country).string_len(255))
                    .col(ColumnDef::new(AssetExif::Description).text())
                    .col(ColumnDef::new(AssetExif::Fps).double_null())
                    .col(ColumnDef::new(AssetExif::ExposureTime).string_len(32))
                    .col(ColumnDef::new(AssetExif::Rating).small_integer())
                    .col(ColumnDef::new(AssetExif::Iso).integer())
                    .col(ColumnDef::new(AssetExif::FNumber).double_null())
                    .col(ColumnDef::new(AssetExif::FocalLength).double_null())
                    .col(ColumnDef::new(AssetExif::LensModel).string_len(255))
                    .col(ColumnDef::new(AssetExif::LivePhotoCid).string_len(255))
                    .col(ColumnDef::new(AssetExif::AutoStackId).string_len(255))
                    .col(ColumnDef::new(AssetExif::Colorspace).string_len(32))
                    .col(ColumnDef::new(AssetExif::BitsPerSample).small_integer())
                    .col(ColumnDef::new(AssetExif::ProfileDescription).string_len(255))
                    .col(ColumnDef::new(AssetExif::Tags).json())
                    // names of fields a user has explicitly set, excluded from
                    // automatic overwrite by the next extractor run (§4.4 step 7/update).
                    .col(
                        ColumnDef::new(AssetExif::LockedProperties)
                            .json()
                            .not_null()
                            .default(Expr::cust("'[]'::json")),
                    )
                    .col(ColumnDef::new(AssetExif::UpdateId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_exif_asset")
                            .from(AssetExif::Table, AssetExif::AssetId)
                            .to(Assets::Table, Assets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_asset_exif_update_id")
                    .table(AssetExif::Table)
                    .col(AssetExif::UpdateId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AssetFiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AssetFiles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AssetFiles::AssetId).uuid().not_null())
                    .col(
                        ColumnDef::new(AssetFiles::Type)
                            .custom(Alias::new("asset_file_type"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(AssetFiles::Path).string_len(1024).not_null())
                    .col(
                        ColumnDef::new(AssetFiles::IsEdited)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_files_asset")
                            .from(AssetFiles::Table, AssetFiles::AssetId)
                            .to(Assets::Table, Assets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_asset_files_asset_type_edited")
                    .table(AssetFiles::Table)
                    .col(AssetFiles::AssetId)
                    .col(AssetFiles::Type)
                    .col(AssetFiles::IsEdited)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AssetMetadata::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AssetMetadata::AssetId).uuid().not_null())
                    .col(ColumnDef::new(AssetMetadata::Key).string_len(255).not_null())
                    .col(ColumnDef::new(AssetMetadata::Value).json().not_null())
                    .col(
                        ColumnDef::new(AssetMetadata::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(AssetMetadata::AssetId)
                            .col(AssetMetadata::Key),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_metadata_asset")
                            .from(AssetMetadata::Table, AssetMetadata::AssetId)
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
            .drop_table(Table::drop().table(AssetMetadata::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AssetFiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AssetExif::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assets::Table).to_owned())
            .await?;
        let conn = manager.get_connection();
        conn.execute_unprepared("DROP TYPE IF EXISTS asset_file_type;").await?;
        conn.execute_unprepared("DROP TYPE IF EXISTS asset_status;").await?;
        conn.execute_unprepared("DROP TYPE IF EXISTS asset_visibility;").await?;
        conn.execute_unprepared("DROP TYPE IF EXISTS asset_type;").await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Assets {
    Table,
    Id,
    OwnerId,
    LibraryId,
    Checksum,
    OriginalPath,
    OriginalFileName,
    DeviceAssetId,
    DeviceId,
    Type,
    Visibility,
    IsFavorite,
    FileCreatedAt,
    FileModifiedAt,
    LocalDateTime,
    FileSizeInByte,
    DurationInSeconds,
    Width,
    Height,
    Thumbhash,
    LivePhotoVideoId,
    StackId,
    Status,
    DeletedAt,
    UpdatedAt,
    UpdateId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum AssetExif {
    Table,
    AssetId,
    Make,
    Model,
    ExifImageWidth,
    ExifImageHeight,
    Orientation,
    DateTimeOriginal,
    ModifyDate,
    TimeZone,
    Latitude,
    Longitude,
    ProjectionType,
    City,
    State,
    Country,
    Description,
    Fps,
    ExposureTime,
    Rating,
    Iso,
    FNumber,
    FocalLength,
    LensModel,
    LivePhotoCid,
    AutoStackId,
    Colorspace,
    BitsPerSample,
    ProfileDescription,
    Tags,
    LockedProperties,
    UpdateId,
}

#[derive(DeriveIden)]
pub enum AssetFiles {
    Table,
    Id,
    AssetId,
    Type,
    Path,
    IsEdited,
}

#[derive(DeriveIden)]
pub enum AssetMetadata {
    Table,
    AssetId,
    Key,
    Value,
    UpdatedAt,
}
