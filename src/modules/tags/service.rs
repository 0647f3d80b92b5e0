use uuid::Uuid;

use crate::shared::context::ServiceContext;
use crate::shared::error::{AppError, AppResult};

use super::domain::{TagPatch, TagResponse};
use super::repo;

pub struct TagsService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TagsService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Tags carry no AccessGuard permission of their own (§4.3's table has no
    /// `tag.*` entry) — ownership is checked directly against `user_id`.
    async fn owned(&self, id: Uuid, user_id: Uuid) -> AppResult<crate::entity::tag::Model> {
        let tag = repo::find(&self.ctx.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("tag".into()))?;
        if tag.user_id != user_id {
            return Err(AppError::Forbidden);
        }
        Ok(tag)
    }

    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<TagResponse>> {
        Ok(repo::list_for_user(&self.ctx.db, user_id)
            .await?
            .into_iter()
            .map(TagResponse::from)
            .collect())
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        value: String,
        color: Option<String>,
        parent_id: Option<Uuid>,
    ) -> AppResult<TagResponse> {
        if let Some(parent_id) = parent_id {
            self.owned(parent_id, user_id).await?;
        }
        Ok(repo::create(&self.ctx.db, user_id, value, color, parent_id).await?.into())
    }

    pub async fn update(&self, id: Uuid, user_id: Uuid, patch: TagPatch) -> AppResult<TagResponse> {
        let tag = self.owned(id, user_id).await?;
        Ok(repo::update(&self.ctx.db, tag, &patch).await?.into())
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.owned(id, user_id).await?;
        repo::delete(&self.ctx.db, id).await
    }

    pub async fn tag_assets(&self, id: Uuid, user_id: Uuid, asset_ids: &[Uuid]) -> AppResult<u64> {
        self.owned(id, user_id).await?;
        repo::tag_assets(&self.ctx.db, id, asset_ids).await
    }

    pub async fn untag_assets(&self, id: Uuid, user_id: Uuid, asset_ids: &[Uuid]) -> AppResult<u64> {
        self.owned(id, user_id).await?;
        repo::untag_assets(&self.ctx.db, id, asset_ids).await
    }
}
