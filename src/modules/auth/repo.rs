use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entity::{api_key, session, shared_link, user};
use crate::shared::error::AppResult;

pub async fn find_session_by_token_hash(
    db: &DatabaseConnection,
    token_hash: &str,
) -> AppResult<Option<session::Model>> {
    Ok(session::Entity::find()
        .filter(session::Column::TokenHash.eq(token_hash))
        .one(db)
        .await?)
}

pub async fn find_api_key_by_key_hash(
    db: &DatabaseConnection,
    key_hash: &str,
) -> AppResult<Option<api_key::Model>> {
    Ok(api_key::Entity::find()
        .filter(api_key::Column::KeyHash.eq(key_hash))
        .one(db)
        .await?)
}

pub async fn find_shared_link_by_key(
    db: &DatabaseConnection,
    key_bytes: &[u8],
) -> AppResult<Option<shared_link::Model>> {
    Ok(shared_link::Entity::find()
        .filter(shared_link::Column::Key.eq(key_bytes.to_vec()))
        .one(db)
        .await?)
}

pub async fn find_shared_link_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> AppResult<Option<shared_link::Model>> {
    Ok(shared_link::Entity::find()
        .filter(shared_link::Column::Slug.eq(slug))
        .one(db)
        .await?)
}

pub async fn find_user_for_session(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> AppResult<Option<user::Model>> {
    Ok(user::Entity::find_by_id(user_id).one(db).await?)
}

/// §5: "sessions are read-mostly; `updatedAt`/`appVersion` freshening is
/// fire-and-forget (errors ignored)".
pub async fn touch_session(db: &DatabaseConnection, session_id: Uuid) {
    let result = session::Entity::update(session::ActiveModel {
        id: Set(session_id),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    })
    .exec(db)
    .await;

    if let Err(err) = result {
        tracing::warn!("failed to freshen session {session_id}: {err}");
    }
}

pub async fn create_session(
    db: &DatabaseConnection,
    active: session::ActiveModel,
) -> AppResult<session::Model> {
    Ok(active.insert(db).await?)
}

pub async fn delete_session(db: &DatabaseConnection, session_id: Uuid) -> AppResult<()> {
    session::Entity::delete_by_id(session_id).exec(db).await?;
    Ok(())
}
