use sea_orm_migration::prelude::*;

use crate::m20240601_000003_create_stacks_table::Stacks;
use crate::m20240601_000004_create_assets_tables::Assets;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_stacks_primary_asset")
                    .from(Stacks::Table, Stacks::PrimaryAssetId)
                    .to(Assets::Table, Assets::Id)
                    // invariant 6 (stack primacy): removing the primary asset
                    // from its stack is forbidden at the service layer; this
                    // restrict is the storage-level backstop.
                    .on_delete(ForeignKeyAction::Restrict)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .table(Stacks::Table)
                    .name("fk_stacks_primary_asset")
                    .to_owned(),
            )
            .await
    }
}
