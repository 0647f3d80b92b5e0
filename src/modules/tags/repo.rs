use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use crate::entity::{tag, tag_asset};
use crate::shared::error::AppResult;
use crate::shared::ids::new_id;

pub async fn find(db: &DatabaseConnection, id: Uuid) -> AppResult<Option<tag::Model>> {
    Ok(tag::Entity::find_by_id(id).one(db).await?)
}

pub async fn list_for_user(db: &DatabaseConnection, user_id: Uuid) -> AppResult<Vec<tag::Model>> {
    Ok(tag::Entity::find()
        .filter(tag::Column::UserId.eq(user_id))
        .order_by_asc(tag::Column::Value)
        .all(db)
        .await?)
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: Uuid,
    value: String,
    color: Option<String>,
    parent_id: Option<Uuid>,
) -> AppResult<tag::Model> {
    Ok(tag::ActiveModel {
        id: Set(new_id()),
        user_id: Set(user_id),
        value: Set(value),
        color: Set(color),
        parent_id: Set(parent_id),
        created_at: Set(chrono::Utc::now().into()),
    }
    .insert(db)
    .await?)
}

pub async fn update(db: &DatabaseConnection, model: tag::Model, patch: &super::domain::TagPatch) -> AppResult<tag::Model> {
    let mut am: tag::ActiveModel = model.into();
    if let Some(value) = &patch.value {
        am.value = Set(value.clone());
    }
    if let Some(color) = &patch.color {
        am.color = Set(Some(color.clone()));
    }
    Ok(am.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    tag_asset::Entity::delete_many()
        .filter(tag_asset::Column::TagId.eq(id))
        .exec(db)
        .await?;
    tag::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

pub async fn tag_assets(db: &DatabaseConnection, tag_id: Uuid, asset_ids: &[Uuid]) -> AppResult<u64> {
    let existing: Vec<Uuid> = tag_asset::Entity::find()
        .filter(tag_asset::Column::TagId.eq(tag_id))
        .filter(tag_asset::Column::AssetId.is_in(asset_ids.to_vec()))
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
        tag_asset::ActiveModel {
            tag_id: Set(tag_id),
            asset_id: Set(*asset_id),
        }
        .insert(db)
        .await?;
        added += 1;
    }
    Ok(added)
}

pub async fn untag_assets(db: &DatabaseConnection, tag_id: Uuid, asset_ids: &[Uuid]) -> AppResult<u64> {
    let res = tag_asset::Entity::delete_many()
        .filter(tag_asset::Column::TagId.eq(tag_id))
        .filter(tag_asset::Column::AssetId.is_in(asset_ids.to_vec()))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
