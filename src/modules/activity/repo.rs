use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entity::activity;
use crate::shared::error::AppResult;
use crate::shared::ids::new_id;

pub async fn find(db: &DatabaseConnection, id: Uuid) -> AppResult<Option<activity::Model>> {
    Ok(activity::Entity::find_by_id(id).one(db).await?)
}

pub async fn list_for_album(
    db: &DatabaseConnection,
    album_id: Uuid,
    asset_id: Option<Uuid>,
) -> AppResult<Vec<activity::Model>> {
    let mut query = activity::Entity::find().filter(activity::Column::AlbumId.eq(album_id));
    if let Some(asset_id) = asset_id {
        query = query.filter(activity::Column::AssetId.eq(asset_id));
    }
    Ok(query.order_by_asc(activity::Column::CreatedAt).all(db).await?)
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: Uuid,
    album_id: Uuid,
    asset_id: Option<Uuid>,
    is_liked: bool,
    comment: Option<String>,
) -> AppResult<activity::Model> {
    Ok(activity::ActiveModel {
        id: Set(new_id()),
        user_id: Set(user_id),
        album_id: Set(album_id),
        asset_id: Set(asset_id),
        is_liked: Set(is_liked),
        comment: Set(comment),
        created_at: Set(chrono::Utc::now().into()),
    }
    .insert(db)
    .await?)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    activity::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
