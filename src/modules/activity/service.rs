use uuid::Uuid;

use crate::modules::albums;
use crate::shared::context::ServiceContext;
use crate::shared::error::{AppError, AppResult};

use super::domain::ActivityResponse;
use super::repo;

pub struct ActivityService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ActivityService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn list(&self, album_id: Uuid, asset_id: Option<Uuid>) -> AppResult<Vec<ActivityResponse>> {
        Ok(repo::list_for_album(&self.ctx.db, album_id, asset_id)
            .await?
            .into_iter()
            .map(ActivityResponse::from)
            .collect())
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        album_id: Uuid,
        asset_id: Option<Uuid>,
        is_liked: bool,
        comment: Option<String>,
    ) -> AppResult<ActivityResponse> {
        Ok(repo::create(&self.ctx.db, user_id, album_id, asset_id, is_liked, comment)
            .await?
            .into())
    }

    /// Only the activity's own author or the album's owner may remove it —
    /// §3.1 names no separate `activity.delete` permission, so this is
    /// checked directly rather than through AccessGuard.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        let activity = repo::find(&self.ctx.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("activity".into()))?;

        if activity.user_id != user_id {
            let album = albums::repo::find(&self.ctx.db, activity.album_id)
                .await?
                .ok_or_else(|| AppError::NotFound("album".into()))?;
            if album.owner_id != user_id {
                return Err(AppError::Forbidden);
            }
        }

        repo::delete(&self.ctx.db, id).await
    }
}
