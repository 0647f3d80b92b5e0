use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Stacks and assets reference each other (stack.primary_asset_id -> asset.id,
// asset.stack_id -> stack.id). The stack row is created here without the
// primary-asset FK; m20240601_000012 adds that constraint once the assets
// table exists.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stacks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Stacks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Stacks::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Stacks::PrimaryAssetId).uuid().not_null())
                    .col(ColumnDef::new(Stacks::UpdateId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stacks_owner")
                            .from(Stacks::Table, Stacks::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stacks_owner_update_id")
                    .table(Stacks::Table)
                    .col(Stacks::OwnerId)
                    .col(Stacks::UpdateId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Stacks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Stacks {
    Table,
    Id,
    OwnerId,
    PrimaryAssetId,
    UpdateId,
}
