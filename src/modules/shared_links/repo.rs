use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::{shared_link, shared_link_asset};
use crate::shared::crypto::random_bytes;
use crate::shared::error::AppResult;
use crate::shared::ids::new_id;

pub const KEY_LENGTH: usize = 50;

pub async fn find(db: &DatabaseConnection, id: Uuid) -> AppResult<Option<shared_link::Model>> {
    Ok(shared_link::Entity::find_by_id(id).one(db).await?)
}

pub async fn list_for_user(db: &DatabaseConnection, user_id: Uuid) -> AppResult<Vec<shared_link::Model>> {
    Ok(shared_link::Entity::find()
        .filter(shared_link::Column::UserId.eq(user_id))
        .order_by_desc(shared_link::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn asset_ids(db: &DatabaseConnection, shared_link_id: Uuid) -> AppResult<Vec<Uuid>> {
    Ok(shared_link_asset::Entity::find()
        .filter(shared_link_asset::Column::SharedLinkId.eq(shared_link_id))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.asset_id)
        .collect())
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    db: &DatabaseConnection,
    user_id: Uuid,
    album_id: Option<Uuid>,
    asset_ids: &[Uuid],
    slug: Option<String>,
    expires_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    password: Option<String>,
    show_exif: bool,
    allow_upload: bool,
    allow_download: bool,
) -> AppResult<shared_link::Model> {
    let txn = db.begin().await?;

    let link = shared_link::ActiveModel {
        id: Set(new_id()),
        user_id: Set(user_id),
        key: Set(random_bytes(KEY_LENGTH)),
        slug: Set(slug),
        expires_at: Set(expires_at),
        password: Set(password),
        show_exif: Set(show_exif),
        allow_upload: Set(allow_upload),
        allow_download: Set(allow_download),
        album_id: Set(album_id),
        created_at: Set(chrono::Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    for asset_id in asset_ids {
        shared_link_asset::ActiveModel {
            shared_link_id: Set(link.id),
            asset_id: Set(*asset_id),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    Ok(link)
}

pub async fn update(
    db: &DatabaseConnection,
    model: shared_link::Model,
    patch: &super::domain::SharedLinkPatch,
) -> AppResult<shared_link::Model> {
    let mut am: shared_link::ActiveModel = model.into();
    if let Some(slug) = &patch.slug {
        am.slug = Set(Some(slug.clone()));
    }
    if let Some(expires_at) = patch.expires_at {
        am.expires_at = Set(Some(expires_at));
    }
    if let Some(password) = &patch.password {
        am.password = Set(Some(password.clone()));
    }
    if let Some(show_exif) = patch.show_exif {
        am.show_exif = Set(show_exif);
    }
    if let Some(allow_upload) = patch.allow_upload {
        am.allow_upload = Set(allow_upload);
    }
    if let Some(allow_download) = patch.allow_download {
        am.allow_download = Set(allow_download);
    }
    Ok(am.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    shared_link_asset::Entity::delete_many()
        .filter(shared_link_asset::Column::SharedLinkId.eq(id))
        .exec(db)
        .await?;
    shared_link::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
