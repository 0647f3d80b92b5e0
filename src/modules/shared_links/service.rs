use uuid::Uuid;

use crate::shared::context::ServiceContext;
use crate::shared::error::{AppError, AppResult};

use super::domain::{to_response, CreateSharedLinkRequest, SharedLinkPatch, SharedLinkResponse};
use super::repo;

pub struct SharedLinksService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SharedLinksService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn owned(&self, id: Uuid, user_id: Uuid) -> AppResult<crate::entity::shared_link::Model> {
        let link = repo::find(&self.ctx.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("shared link".into()))?;
        if link.user_id != user_id {
            return Err(AppError::Forbidden);
        }
        Ok(link)
    }

    async fn to_response(&self, link: crate::entity::shared_link::Model) -> AppResult<SharedLinkResponse> {
        let asset_ids = repo::asset_ids(&self.ctx.db, link.id).await?;
        Ok(to_response(link, asset_ids))
    }

    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<SharedLinkResponse>> {
        let mut out = Vec::new();
        for link in repo::list_for_user(&self.ctx.db, user_id).await? {
            out.push(self.to_response(link).await?);
        }
        Ok(out)
    }

    pub async fn get(&self, id: Uuid, user_id: Uuid) -> AppResult<SharedLinkResponse> {
        let link = self.owned(id, user_id).await?;
        self.to_response(link).await
    }

    /// Enforces invariant 7: exactly one of `albumId`/`assetIds`.
    pub async fn create(&self, user_id: Uuid, req: CreateSharedLinkRequest) -> AppResult<SharedLinkResponse> {
        let has_album = req.album_id.is_some();
        let has_assets = !req.asset_ids.is_empty();
        if has_album == has_assets {
            return Err(AppError::BadRequest(
                "exactly one of albumId or assetIds must be set".into(),
            ));
        }

        let link = repo::create(
            &self.ctx.db,
            user_id,
            req.album_id,
            &req.asset_ids,
            req.slug,
            req.expires_at,
            req.password,
            req.show_exif,
            req.allow_upload,
            req.allow_download,
        )
        .await?;
        self.to_response(link).await
    }

    pub async fn update(&self, id: Uuid, user_id: Uuid, patch: SharedLinkPatch) -> AppResult<SharedLinkResponse> {
        let link = self.owned(id, user_id).await?;
        let updated = repo::update(&self.ctx.db, link, &patch).await?;
        self.to_response(updated).await
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.owned(id, user_id).await?;
        repo::delete(&self.ctx.db, id).await
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::test_helpers::TestContextBuilder;

    use super::*;

    fn base_request() -> CreateSharedLinkRequest {
        CreateSharedLinkRequest {
            album_id: None,
            asset_ids: Vec::new(),
            slug: None,
            expires_at: None,
            password: None,
            show_exif: false,
            allow_upload: false,
            allow_download: false,
        }
    }

    #[tokio::test]
    async fn create_rejects_neither_album_nor_assets() {
        let ctx = TestContextBuilder::new().build();
        let service = SharedLinksService::new(&ctx);
        let err = service.create(Uuid::new_v4(), base_request()).await.unwrap_err();
        assert!(matches!(err, crate::shared::error::AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn create_rejects_both_album_and_assets() {
        let ctx = TestContextBuilder::new().build();
        let service = SharedLinksService::new(&ctx);
        let mut req = base_request();
        req.album_id = Some(Uuid::new_v4());
        req.asset_ids = vec![Uuid::new_v4()];
        let err = service.create(Uuid::new_v4(), req).await.unwrap_err();
        assert!(matches!(err, crate::shared::error::AppError::BadRequest(_)));
    }
}
