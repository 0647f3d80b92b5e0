use sea_orm::ActiveModelTrait;
use uuid::Uuid;

use crate::entity::album_user::AlbumUserRole;
use crate::shared::context::ServiceContext;
use crate::shared::error::{AppError, AppResult};

use super::domain::{role_str, AlbumPatch, AlbumResponse, AlbumUserEntry};
use super::repo;

pub struct AlbumsService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AlbumsService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn to_response(&self, album: crate::entity::album::Model) -> AppResult<AlbumResponse> {
        let asset_count = repo::asset_count(&self.ctx.db, album.id).await?;
        let users = repo::users_for_album(&self.ctx.db, album.id)
            .await?
            .into_iter()
            .map(|u| AlbumUserEntry {
                user_id: u.user_id,
                role: role_str(&u.role),
            })
            .collect();

        Ok(AlbumResponse {
            id: album.id,
            owner_id: album.owner_id,
            album_name: album.album_name,
            description: album.description,
            album_thumbnail_asset_id: album.album_thumbnail_asset_id,
            is_activity_enabled: album.is_activity_enabled,
            asset_count,
            shared_users: users,
            created_at: album.created_at,
            updated_at: album.updated_at,
        })
    }

    pub async fn get(&self, id: Uuid) -> AppResult<AlbumResponse> {
        let album = repo::find(&self.ctx.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("album".into()))?;
        self.to_response(album).await
    }

    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<AlbumResponse>> {
        let albums = repo::list_for_user(&self.ctx.db, user_id).await?;
        let mut out = Vec::with_capacity(albums.len());
        for album in albums {
            out.push(self.to_response(album).await?);
        }
        Ok(out)
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        album_name: String,
        description: String,
        asset_ids: &[Uuid],
    ) -> AppResult<AlbumResponse> {
        let album = repo::create(&self.ctx.db, owner_id, album_name, description, asset_ids).await?;
        self.to_response(album).await
    }

    /// Applies a patch, enforcing invariant 5 (album thumbnail validity):
    /// `albumThumbnailAssetId`, if set, must already be a member of the album.
    pub async fn update(&self, id: Uuid, patch: AlbumPatch) -> AppResult<AlbumResponse> {
        let album = repo::find(&self.ctx.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("album".into()))?;

        if let Some(thumb) = patch.album_thumbnail_asset_id {
            if !repo::is_album_member(&self.ctx.db, id, thumb).await? {
                return Err(AppError::BadRequest(
                    "albumThumbnailAssetId must reference an asset in the album".into(),
                ));
            }
        }

        let updated = repo::update(&self.ctx.db, album.into(), &patch).await?;
        self.to_response(updated).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        repo::delete(&self.ctx.db, id).await
    }

    pub async fn add_assets(&self, album_id: Uuid, asset_ids: &[Uuid]) -> AppResult<u64> {
        repo::add_assets(&self.ctx.db, album_id, asset_ids).await
    }

    /// Removing the current thumbnail clears `albumThumbnailAssetId` first —
    /// otherwise invariant 5 would be left violated by a dangling reference.
    pub async fn remove_assets(&self, album_id: Uuid, asset_ids: &[Uuid]) -> AppResult<u64> {
        let album = repo::find(&self.ctx.db, album_id)
            .await?
            .ok_or_else(|| AppError::NotFound("album".into()))?;

        if let Some(thumb) = album.album_thumbnail_asset_id {
            if asset_ids.contains(&thumb) {
                let mut am: crate::entity::album::ActiveModel = album.into();
                am.album_thumbnail_asset_id = sea_orm::ActiveValue::Set(None);
                am.update_id = sea_orm::ActiveValue::Set(crate::shared::ids::new_id());
                am.update(&self.ctx.db).await?;
            }
        }

        repo::remove_assets(&self.ctx.db, album_id, asset_ids).await
    }

    pub async fn add_users(&self, album_id: Uuid, users: &[(Uuid, AlbumUserRole)]) -> AppResult<()> {
        repo::add_users(&self.ctx.db, album_id, users).await
    }

    pub async fn update_user_role(&self, album_id: Uuid, user_id: Uuid, role: AlbumUserRole) -> AppResult<()> {
        repo::update_user_role(&self.ctx.db, album_id, user_id, role).await
    }

    pub async fn remove_user(&self, album_id: Uuid, user_id: Uuid) -> AppResult<()> {
        repo::remove_user(&self.ctx.db, album_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::test_helpers::TestContextBuilder;

    use super::*;

    fn sample_album(owner_id: Uuid, thumb: Option<Uuid>) -> crate::entity::album::Model {
        let now = chrono::Utc::now().into();
        crate::entity::album::Model {
            id: Uuid::new_v4(),
            owner_id,
            album_name: "Trip".into(),
            description: String::new(),
            album_thumbnail_asset_id: thumb,
            sort_order: 0,
            is_activity_enabled: true,
            created_at: now,
            updated_at: now,
            update_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn update_rejects_thumbnail_not_in_album() {
        let owner = Uuid::new_v4();
        let album = sample_album(owner, None);
        let stray_asset = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![album]])
            .append_query_results([Vec::<crate::entity::album_asset::Model>::new()])
            .into_connection();

        let ctx = TestContextBuilder::new().with_db(db).build();
        let service = AlbumsService::new(&ctx);

        let mut patch = AlbumPatch::default();
        patch.album_thumbnail_asset_id = Some(stray_asset);

        let err = service.update(Uuid::new_v4(), patch).await.unwrap_err();
        assert!(matches!(err, crate::shared::error::AppError::BadRequest(_)));
    }
}
