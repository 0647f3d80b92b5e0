use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Partners::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Partners::SharedById).uuid().not_null())
                    .col(ColumnDef::new(Partners::SharedWithId).uuid().not_null())
                    .col(
                        ColumnDef::new(Partners::InTimeline)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Partners::UpdateId).uuid().not_null())
                    .col(
                        ColumnDef::new(Partners::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(Partners::SharedById)
                            .col(Partners::SharedWithId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_partners_shared_by")
                            .from(Partners::Table, Partners::SharedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_partners_shared_with")
                            .from(Partners::Table, Partners::SharedWithId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_partners_shared_with")
                    .table(Partners::Table)
                    .col(Partners::SharedWithId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Partners::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Partners {
    Table,
    SharedById,
    SharedWithId,
    InTimeline,
    UpdateId,
    CreatedAt,
}
