use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entity::{asset, stack};
use crate::shared::error::AppResult;
use crate::shared::ids::new_id;

pub async fn find(db: &DatabaseConnection, id: Uuid) -> AppResult<Option<stack::Model>> {
    Ok(stack::Entity::find_by_id(id).one(db).await?)
}

pub async fn member_asset_ids(db: &DatabaseConnection, stack_id: Uuid) -> AppResult<Vec<Uuid>> {
    Ok(asset::Entity::find()
        .filter(asset::Column::StackId.eq(stack_id))
        .all(db)
        .await?
        .into_iter()
        .map(|a| a.id)
        .collect())
}

/// Creates a stack and assigns every listed asset's `stack_id` to it.
pub async fn create(db: &DatabaseConnection, owner_id: Uuid, primary_asset_id: Uuid, asset_ids: &[Uuid]) -> AppResult<stack::Model> {
    let txn = db.begin().await?;

    let created = stack::ActiveModel {
        id: Set(new_id()),
        owner_id: Set(owner_id),
        primary_asset_id: Set(primary_asset_id),
        update_id: Set(new_id()),
    }
    .insert(&txn)
    .await?;

    for asset_id in asset_ids {
        if let Some(row) = asset::Entity::find_by_id(*asset_id).one(&txn).await? {
            let mut am: asset::ActiveModel = row.into();
            am.stack_id = Set(Some(created.id));
            am.update_id = Set(new_id());
            am.update(&txn).await?;
        }
    }

    txn.commit().await?;
    Ok(created)
}

pub async fn set_primary(db: &DatabaseConnection, model: stack::Model, primary_asset_id: Uuid) -> AppResult<stack::Model> {
    let mut am: stack::ActiveModel = model.into();
    am.primary_asset_id = Set(primary_asset_id);
    am.update_id = Set(new_id());
    Ok(am.update(db).await?)
}

/// Dissolves a stack: clears `stack_id` on every member asset, then deletes
/// the stack row.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    let txn = db.begin().await?;
    let members = asset::Entity::find()
        .filter(asset::Column::StackId.eq(id))
        .all(&txn)
        .await?;
    for row in members {
        let mut am: asset::ActiveModel = row.into();
        am.stack_id = Set(None);
        am.update_id = Set(new_id());
        am.update(&txn).await?;
    }
    stack::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    Ok(())
}

pub async fn remove_asset(db: &DatabaseConnection, stack_id: Uuid, asset_id: Uuid) -> AppResult<()> {
    if let Some(row) = asset::Entity::find_by_id(asset_id).one(db).await? {
        if row.stack_id == Some(stack_id) {
            let mut am: asset::ActiveModel = row.into();
            am.stack_id = Set(None);
            am.update_id = Set(new_id());
            am.update(db).await?;
        }
    }
    Ok(())
}
