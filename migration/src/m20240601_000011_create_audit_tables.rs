use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// One audit row is inserted whenever a row of the corresponding live table is
// hard-deleted (or, for assets, soft-deleted past the point the sync protocol
// should stop considering it live). `id` is a fresh time-ordered identifier,
// not a copy of the deleted row's id, so it can serve as the sync watermark
// for the delete scan (§4.6 "audit delete" family).
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_audit_table(manager, "user_audit", &[("user_id", false)]).await?;
        create_audit_table(manager, "asset_audit", &[("owner_id", true), ("asset_id", false)]).await?;
        create_audit_table(manager, "stack_audit", &[("owner_id", true), ("stack_id", false)]).await?;
        create_audit_table(
            manager,
            "partner_audit",
            &[("shared_by_id", true), ("shared_with_id", false)],
        )
        .await?;
        create_audit_table(manager, "album_audit", &[("owner_id", true), ("album_id", false)]).await?;
        create_audit_table(
            manager,
            "album_asset_audit",
            &[("album_id", true), ("asset_id", false)],
        )
        .await?;
        create_audit_table(
            manager,
            "album_user_audit",
            &[("album_id", true), ("user_id", false)],
        )
        .await?;
        create_audit_table(manager, "memory_audit", &[("owner_id", true), ("memory_id", false)]).await?;
        create_audit_table(
            manager,
            "memory_asset_audit",
            &[("memories_id", true), ("asset_id", false)],
        )
        .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "memory_asset_audit",
            "memory_audit",
            "album_user_audit",
            "album_asset_audit",
            "album_audit",
            "partner_audit",
            "stack_audit",
            "asset_audit",
            "user_audit",
        ] {
            manager
                .drop_table(Table::drop().table(Alias::new(name)).to_owned())
                .await?;
        }
        Ok(())
    }
}

/// `columns` is `(name, is_owner_fk)` pairs after `id`; all are plain uuid
/// columns (no FK constraint — the referenced row is typically already gone
/// by the time the audit row is read by a sync scan).
async fn create_audit_table(
    manager: &SchemaManager<'_>,
    table_name: &str,
    columns: &[(&str, bool)],
) -> Result<(), DbErr> {
    let table = Alias::new(table_name);
    let mut stmt = Table::create();
    stmt.table(table.clone())
        .if_not_exists()
        .col(ColumnDef::new(Alias::new("id")).uuid().not_null().primary_key())
        .col(
            ColumnDef::new(Alias::new("deleted_at"))
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        );
    for (name, _) in columns {
        stmt.col(ColumnDef::new(Alias::new(*name)).uuid().not_null());
    }
    manager.create_table(stmt.to_owned()).await?;

    for (name, is_owner) in columns {
        if *is_owner {
            manager
                .create_index(
                    Index::create()
                        .name(format!("idx_{table_name}_{name}_id"))
                        .table(table.clone())
                        .col(Alias::new(*name))
                        .col(Alias::new("id"))
                        .to_owned(),
                )
                .await?;
        }
    }

    Ok(())
}
