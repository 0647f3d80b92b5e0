use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use crate::entity::{memory, memory_asset};
use crate::shared::error::AppResult;
use crate::shared::ids::new_id;

pub async fn find(db: &DatabaseConnection, id: Uuid) -> AppResult<Option<memory::Model>> {
    Ok(memory::Entity::find_by_id(id).one(db).await?)
}

pub async fn list_for_user(db: &DatabaseConnection, owner_id: Uuid) -> AppResult<Vec<memory::Model>> {
    Ok(memory::Entity::find()
        .filter(memory::Column::OwnerId.eq(owner_id))
        .order_by_desc(memory::Column::MemoryAt)
        .all(db)
        .await?)
}

pub async fn asset_ids(db: &DatabaseConnection, memory_id: Uuid) -> AppResult<Vec<Uuid>> {
    Ok(memory_asset::Entity::find()
        .filter(memory_asset::Column::MemoriesId.eq(memory_id))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.asset_id)
        .collect())
}

pub async fn create(
    db: &DatabaseConnection,
    owner_id: Uuid,
    r#type: String,
    data: serde_json::Value,
    memory_at: chrono::DateTime<chrono::FixedOffset>,
    is_saved: bool,
    asset_ids: &[Uuid],
) -> AppResult<memory::Model> {
    let now = chrono::Utc::now();
    let memory = memory::ActiveModel {
        id: Set(new_id()),
        owner_id: Set(owner_id),
        r#type: Set(r#type),
        data: Set(data),
        is_saved: Set(is_saved),
        memory_at: Set(memory_at),
        seen_at: Set(None),
        created_at: Set(now.into()),
        update_id: Set(new_id()),
    }
    .insert(db)
    .await?;

    for asset_id in asset_ids {
        memory_asset::ActiveModel {
            memories_id: Set(memory.id),
            asset_id: Set(*asset_id),
        }
        .insert(db)
        .await?;
    }

    Ok(memory)
}

pub async fn update(
    db: &DatabaseConnection,
    model: memory::Model,
    patch: &super::domain::MemoryPatch,
) -> AppResult<memory::Model> {
    let mut am: memory::ActiveModel = model.into();
    let mut changed = false;
    if let Some(saved) = patch.is_saved {
        am.is_saved = Set(saved);
        changed = true;
    }
    if patch.is_seen == Some(true) {
        am.seen_at = Set(Some(chrono::Utc::now().into()));
        changed = true;
    }
    if changed {
        am.update_id = Set(new_id());
    }
    Ok(am.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    memory_asset::Entity::delete_many()
        .filter(memory_asset::Column::MemoriesId.eq(id))
        .exec(db)
        .await?;
    memory::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

pub async fn add_assets(db: &DatabaseConnection, memory_id: Uuid, asset_ids: &[Uuid]) -> AppResult<u64> {
    let existing: Vec<Uuid> = memory_asset::Entity::find()
        .filter(memory_asset::Column::MemoriesId.eq(memory_id))
        .filter(memory_asset::Column::AssetId.is_in(asset_ids.to_vec()))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.asset_id)
        .collect();

    let mut added = 0;
    for asset_id in asset_ids {
        if existing.contains(asset_id) {
            continue;
        }
        memory_asset::ActiveModel {
            memories_id: Set(memory_id),
            asset_id: Set(*asset_id),
        }
        .insert(db)
        .await?;
        added += 1;
    }
    Ok(added)
}

pub async fn remove_assets(db: &DatabaseConnection, memory_id: Uuid, asset_ids: &[Uuid]) -> AppResult<u64> {
    let res = memory_asset::Entity::delete_many()
        .filter(memory_asset::Column::MemoriesId.eq(memory_id))
        .filter(memory_asset::Column::AssetId.is_in(asset_ids.to_vec()))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
