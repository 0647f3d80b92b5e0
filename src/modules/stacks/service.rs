use uuid::Uuid;

use crate::shared::context::ServiceContext;
use crate::shared::error::{AppError, AppResult};

use super::domain::StackResponse;
use super::repo;

pub struct StacksService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StacksService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn to_response(&self, stack: crate::entity::stack::Model) -> AppResult<StackResponse> {
        let asset_ids = repo::member_asset_ids(&self.ctx.db, stack.id).await?;
        Ok(StackResponse {
            id: stack.id,
            owner_id: stack.owner_id,
            primary_asset_id: stack.primary_asset_id,
            asset_ids,
        })
    }

    async fn owned(&self, id: Uuid, owner_id: Uuid) -> AppResult<crate::entity::stack::Model> {
        let stack = repo::find(&self.ctx.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("stack".into()))?;
        if stack.owner_id != owner_id {
            return Err(AppError::Forbidden);
        }
        Ok(stack)
    }

    pub async fn get(&self, id: Uuid, owner_id: Uuid) -> AppResult<StackResponse> {
        let stack = self.owned(id, owner_id).await?;
        self.to_response(stack).await
    }

    pub async fn create(&self, owner_id: Uuid, asset_ids: &[Uuid], primary_asset_id: Option<Uuid>) -> AppResult<StackResponse> {
        let primary = primary_asset_id
            .or_else(|| asset_ids.first().copied())
            .ok_or_else(|| AppError::BadRequest("assetIds must not be empty".into()))?;
        if !asset_ids.contains(&primary) {
            return Err(AppError::BadRequest(
                "primaryAssetId must be a member of assetIds".into(),
            ));
        }
        let stack = repo::create(&self.ctx.db, owner_id, primary, asset_ids).await?;
        self.to_response(stack).await
    }

    pub async fn set_primary(&self, id: Uuid, owner_id: Uuid, primary_asset_id: Uuid) -> AppResult<StackResponse> {
        let stack = self.owned(id, owner_id).await?;
        let members = repo::member_asset_ids(&self.ctx.db, id).await?;
        if !members.contains(&primary_asset_id) {
            return Err(AppError::BadRequest(
                "primaryAssetId must be a member of the stack".into(),
            ));
        }
        let updated = repo::set_primary(&self.ctx.db, stack, primary_asset_id).await?;
        self.to_response(updated).await
    }

    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<()> {
        self.owned(id, owner_id).await?;
        repo::delete(&self.ctx.db, id).await
    }

    /// Invariant 6 (stack primacy): removing the primary asset from its own
    /// stack is forbidden.
    pub async fn remove_asset(&self, id: Uuid, owner_id: Uuid, asset_id: Uuid) -> AppResult<()> {
        let stack = self.owned(id, owner_id).await?;
        if stack.primary_asset_id == asset_id {
            return Err(AppError::BadRequest(
                "cannot remove a stack's primary asset; delete the stack or change its primary first".into(),
            ));
        }
        repo::remove_asset(&self.ctx.db, id, asset_id).await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use crate::test_helpers::TestContextBuilder;

    use super::*;

    #[tokio::test]
    async fn create_rejects_primary_not_in_asset_ids() {
        let ctx = TestContextBuilder::new().build();
        let service = StacksService::new(&ctx);

        let owner = Uuid::new_v4();
        let members = vec![Uuid::new_v4(), Uuid::new_v4()];
        let stray = Uuid::new_v4();

        let err = service.create(owner, &members, Some(stray)).await.unwrap_err();
        assert!(matches!(err, crate::shared::error::AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn create_rejects_empty_asset_ids_with_no_primary() {
        let ctx = TestContextBuilder::new().build();
        let service = StacksService::new(&ctx);

        let err = service.create(Uuid::new_v4(), &[], None).await.unwrap_err();
        assert!(matches!(err, crate::shared::error::AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn remove_asset_rejects_removing_the_primary() {
        let owner = Uuid::new_v4();
        let stack_id = Uuid::new_v4();
        let primary = Uuid::new_v4();

        let stack_row = crate::entity::stack::Model {
            id: stack_id,
            owner_id: owner,
            primary_asset_id: primary,
            update_id: Uuid::new_v4(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stack_row]])
            .into_connection();
        let ctx = TestContextBuilder::new().with_db(db).build();
        let service = StacksService::new(&ctx);

        let err = service.remove_asset(stack_id, owner, primary).await.unwrap_err();
        assert!(matches!(err, crate::shared::error::AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn remove_asset_rejects_when_caller_is_not_owner() {
        let owner = Uuid::new_v4();
        let stack_id = Uuid::new_v4();

        let stack_row = crate::entity::stack::Model {
            id: stack_id,
            owner_id: owner,
            primary_asset_id: Uuid::new_v4(),
            update_id: Uuid::new_v4(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stack_row]])
            .into_connection();
        let ctx = TestContextBuilder::new().with_db(db).build();
        let service = StacksService::new(&ctx);

        let err = service
            .remove_asset(stack_id, Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, crate::shared::error::AppError::Forbidden));
    }
}
