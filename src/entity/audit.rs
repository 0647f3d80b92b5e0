//! One sea-orm entity per `*_audit` table (§3.1). Each row records that a
//! live-table row was deleted; `id` is a fresh time-ordered identifier used
//! as the sync watermark for that type's delete scan, not a copy of the
//! deleted row's own id.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

macro_rules! audit_entity {
    ($module:ident, $table:literal, { $($field:ident),+ $(,)? }) => {
        pub mod $module {
            use super::*;

            #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
            #[sea_orm(table_name = $table)]
            pub struct Model {
                #[sea_orm(primary_key, auto_increment = false)]
                pub id: Uuid,
                $(pub $field: Uuid,)+
                pub deleted_at: DateTimeWithTimeZone,
            }

            #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
            pub enum Relation {}

            impl ActiveModelBehavior for ActiveModel {}
        }
    };
}

audit_entity!(user_audit, "user_audit", { user_id });
audit_entity!(asset_audit, "asset_audit", { owner_id, asset_id });
audit_entity!(stack_audit, "stack_audit", { owner_id, stack_id });
audit_entity!(partner_audit, "partner_audit", { shared_by_id, shared_with_id });
audit_entity!(album_audit, "album_audit", { owner_id, album_id });
audit_entity!(album_asset_audit, "album_asset_audit", { album_id, asset_id });
audit_entity!(album_user_audit, "album_user_audit", { album_id, user_id });
audit_entity!(memory_audit, "memory_audit", { owner_id, memory_id });
audit_entity!(memory_asset_audit, "memory_asset_audit", { memories_id, asset_id });
