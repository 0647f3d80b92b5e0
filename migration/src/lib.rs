pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_users_table;
mod m20240601_000002_create_sessions_and_api_keys;
mod m20240601_000003_create_stacks_table;
mod m20240601_000004_create_assets_tables;
mod m20240601_000005_create_albums_tables;
mod m20240601_000006_create_tags_tables;
mod m20240601_000007_create_memories_tables;
mod m20240601_000008_create_partners_table;
mod m20240601_000009_create_shared_links_table;
mod m20240601_000010_create_sync_and_activity_tables;
mod m20240601_000011_create_audit_tables;
mod m20240601_000012_add_stack_primary_asset_fk;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_users_table::Migration),
            Box::new(m20240601_000002_create_sessions_and_api_keys::Migration),
            Box::new(m20240601_000003_create_stacks_table::Migration),
            Box::new(m20240601_000004_create_assets_tables::Migration),
            Box::new(m20240601_000005_create_albums_tables::Migration),
            Box::new(m20240601_000006_create_tags_tables::Migration),
            Box::new(m20240601_000007_create_memories_tables::Migration),
            Box::new(m20240601_000008_create_partners_table::Migration),
            Box::new(m20240601_000009_create_shared_links_table::Migration),
            Box::new(m20240601_000010_create_sync_and_activity_tables::Migration),
            Box::new(m20240601_000011_create_audit_tables::Migration),
            Box::new(m20240601_000012_add_stack_primary_asset_fk::Migration),
        ]
    }
}
