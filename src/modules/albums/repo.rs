use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::{album, album_asset, album_user};
use crate::shared::error::AppResult;
use crate::shared::ids::new_id;

pub async fn find(db: &DatabaseConnection, id: Uuid) -> AppResult<Option<album::Model>> {
    Ok(album::Entity::find_by_id(id).one(db).await?)
}

/// Albums the user owns or is a member of (§4.3 `album.read`), newest first.
pub async fn list_for_user(db: &DatabaseConnection, user_id: Uuid) -> AppResult<Vec<album::Model>> {
    use sea_orm::{Condition, QueryOrder};

    let member_of = album_user::Entity::find()
        .filter(album_user::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|au| au.album_id)
        .collect::<Vec<_>>();

    Ok(album::Entity::find()
        .filter(
            Condition::any()
                .add(album::Column::OwnerId.eq(user_id))
                .add(album::Column::Id.is_in(member_of)),
        )
        .order_by_desc(album::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn asset_count(db: &DatabaseConnection, album_id: Uuid) -> AppResult<u64> {
    Ok(album_asset::Entity::find()
        .filter(album_asset::Column::AlbumId.eq(album_id))
        .count(db)
        .await?)
}

pub async fn users_for_album(db: &DatabaseConnection, album_id: Uuid) -> AppResult<Vec<album_user::Model>> {
    Ok(album_user::Entity::find()
        .filter(album_user::Column::AlbumId.eq(album_id))
        .all(db)
        .await?)
}

pub async fn create(
    db: &DatabaseConnection,
    owner_id: Uuid,
    album_name: String,
    description: String,
    asset_ids: &[Uuid],
) -> AppResult<album::Model> {
    let txn = db.begin().await?;
    let now = chrono::Utc::now();

    let album = album::ActiveModel {
        id: Set(new_id()),
        owner_id: Set(owner_id),
        album_name: Set(album_name),
        description: Set(description),
        album_thumbnail_asset_id: Set(None),
        sort_order: Set(0),
        is_activity_enabled: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        update_id: Set(new_id()),
    }
    .insert(&txn)
    .await?;

    for asset_id in asset_ids {
        album_asset::ActiveModel {
            album_id: Set(album.id),
            asset_id: Set(*asset_id),
            update_id: Set(new_id()),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    Ok(album)
}

/// Applies a patch and bumps `updateId` only when something actually changed
/// — mirrors the watermark-monotonicity invariant (§3.2.3) without minting
/// ids for no-op updates.
pub async fn update(
    db: &DatabaseConnection,
    mut model: album::ActiveModel,
    patch: &super::domain::AlbumPatch,
) -> AppResult<album::Model> {
    let mut changed = false;
    if let Some(name) = &patch.album_name {
        model.album_name = Set(name.clone());
        changed = true;
    }
    if let Some(desc) = &patch.description {
        model.description = Set(desc.clone());
        changed = true;
    }
    if let Some(thumb) = patch.album_thumbnail_asset_id {
        model.album_thumbnail_asset_id = Set(Some(thumb));
        changed = true;
    }
    if let Some(enabled) = patch.is_activity_enabled {
        model.is_activity_enabled = Set(enabled);
        changed = true;
    }
    if changed {
        model.updated_at = Set(chrono::Utc::now().into());
        model.update_id = Set(new_id());
    }
    Ok(model.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    album::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

pub async fn add_assets(db: &DatabaseConnection, album_id: Uuid, asset_ids: &[Uuid]) -> AppResult<u64> {
    let existing: Vec<Uuid> = album_asset::Entity::find()
        .filter(album_asset::Column::AlbumId.eq(album_id))
        .filter(album_asset::Column::AssetId.is_in(asset_ids.to_vec()))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.asset_id)
        .collect();

    let now = chrono::Utc::now();
    let mut added = 0;
    for asset_id in asset_ids {
        if existing.contains(asset_id) {
            continue;
        }
        album_asset::ActiveModel {
            album_id: Set(album_id),
            asset_id: Set(*asset_id),
            update_id: Set(new_id()),
            created_at: Set(now.into()),
        }
        .insert(db)
        .await?;
        added += 1;
    }
    Ok(added)
}

/// Removes assets from an album. Invariant 5 (thumbnail validity) means the
/// caller must clear `albumThumbnailAssetId` first if it points at one of
/// these ids — enforced in the service layer, not here.
pub async fn remove_assets(db: &DatabaseConnection, album_id: Uuid, asset_ids: &[Uuid]) -> AppResult<u64> {
    let res = album_asset::Entity::delete_many()
        .filter(album_asset::Column::AlbumId.eq(album_id))
        .filter(album_asset::Column::AssetId.is_in(asset_ids.to_vec()))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn is_album_member(db: &DatabaseConnection, album_id: Uuid, asset_id: Uuid) -> AppResult<bool> {
    Ok(album_asset::Entity::find()
        .filter(album_asset::Column::AlbumId.eq(album_id))
        .filter(album_asset::Column::AssetId.eq(asset_id))
        .one(db)
        .await?
        .is_some())
}

pub async fn add_users(
    db: &DatabaseConnection,
    album_id: Uuid,
    users: &[(Uuid, album_user::AlbumUserRole)],
) -> AppResult<()> {
    for (user_id, role) in users {
        album_user::ActiveModel {
            album_id: Set(album_id),
            user_id: Set(*user_id),
            role: Set(role.clone()),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

pub async fn update_user_role(
    db: &DatabaseConnection,
    album_id: Uuid,
    user_id: Uuid,
    role: album_user::AlbumUserRole,
) -> AppResult<()> {
    let existing = album_user::Entity::find_by_id((album_id, user_id)).one(db).await?;
    if let Some(existing) = existing {
        let mut am: album_user::ActiveModel = existing.into();
        am.role = Set(role);
        am.update(db).await?;
    }
    Ok(())
}

pub async fn remove_user(db: &DatabaseConnection, album_id: Uuid, user_id: Uuid) -> AppResult<()> {
    album_user::Entity::delete_by_id((album_id, user_id)).exec(db).await?;
    Ok(())
}
