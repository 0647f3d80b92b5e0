use uuid::Uuid;

use crate::shared::context::ServiceContext;
use crate::shared::error::{AppError, AppResult};

use super::domain::{Direction, PartnerResponse};
use super::repo;

pub struct PartnersService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PartnersService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn list(&self, self_id: Uuid, direction: Direction) -> AppResult<Vec<PartnerResponse>> {
        let rows = match direction {
            Direction::SharedBy => repo::shared_by(&self.ctx.db, self_id).await?,
            Direction::SharedWith => repo::shared_with(&self.ctx.db, self_id).await?,
        };
        Ok(rows.into_iter().map(PartnerResponse::from).collect())
    }

    /// Creates a partnership with the caller as `sharedById` — the caller is
    /// opting to share their own library with `shared_with_id`.
    pub async fn create(&self, self_id: Uuid, shared_with_id: Uuid) -> AppResult<PartnerResponse> {
        if self_id == shared_with_id {
            return Err(AppError::BadRequest("cannot partner with yourself".into()));
        }
        if repo::find(&self.ctx.db, self_id, shared_with_id).await?.is_some() {
            return Err(AppError::BadRequest("partnership already exists".into()));
        }
        Ok(repo::create(&self.ctx.db, self_id, shared_with_id).await?.into())
    }

    /// `in_timeline` is the recipient's own setting (§4.3 `partner.update`:
    /// caller must be `sharedWithId`), so access is checked by the route via
    /// `AccessGuard` before this runs.
    pub async fn set_in_timeline(&self, shared_by_id: Uuid, self_id: Uuid, in_timeline: bool) -> AppResult<PartnerResponse> {
        let partner = repo::find(&self.ctx.db, shared_by_id, self_id)
            .await?
            .ok_or_else(|| AppError::NotFound("partner".into()))?;
        Ok(repo::set_in_timeline(&self.ctx.db, partner, in_timeline).await?.into())
    }

    /// Revokes a partnership the caller (as `sharedById`) previously granted.
    pub async fn delete(&self, self_id: Uuid, shared_with_id: Uuid) -> AppResult<()> {
        repo::delete(&self.ctx.db, self_id, shared_with_id).await
    }
}
