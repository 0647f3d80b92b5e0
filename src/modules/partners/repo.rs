use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entity::partner;
use crate::shared::error::AppResult;
use crate::shared::ids::new_id;

pub async fn find(db: &DatabaseConnection, shared_by_id: Uuid, shared_with_id: Uuid) -> AppResult<Option<partner::Model>> {
    Ok(partner::Entity::find_by_id((shared_by_id, shared_with_id)).one(db).await?)
}

pub async fn shared_by(db: &DatabaseConnection, shared_by_id: Uuid) -> AppResult<Vec<partner::Model>> {
    Ok(partner::Entity::find()
        .filter(partner::Column::SharedById.eq(shared_by_id))
        .all(db)
        .await?)
}

pub async fn shared_with(db: &DatabaseConnection, shared_with_id: Uuid) -> AppResult<Vec<partner::Model>> {
    Ok(partner::Entity::find()
        .filter(partner::Column::SharedWithId.eq(shared_with_id))
        .all(db)
        .await?)
}

pub async fn create(db: &DatabaseConnection, shared_by_id: Uuid, shared_with_id: Uuid) -> AppResult<partner::Model> {
    Ok(partner::ActiveModel {
        shared_by_id: Set(shared_by_id),
        shared_with_id: Set(shared_with_id),
        in_timeline: Set(true),
        update_id: Set(new_id()),
        created_at: Set(chrono::Utc::now().into()),
    }
    .insert(db)
    .await?)
}

pub async fn set_in_timeline(db: &DatabaseConnection, model: partner::Model, in_timeline: bool) -> AppResult<partner::Model> {
    let mut am: partner::ActiveModel = model.into();
    am.in_timeline = Set(in_timeline);
    am.update_id = Set(new_id());
    Ok(am.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, shared_by_id: Uuid, shared_with_id: Uuid) -> AppResult<()> {
    partner::Entity::delete_by_id((shared_by_id, shared_with_id)).exec(db).await?;
    Ok(())
}
