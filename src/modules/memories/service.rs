use uuid::Uuid;

use crate::shared::context::ServiceContext;
use crate::shared::error::{AppError, AppResult};

use super::domain::{MemoryPatch, MemoryResponse};
use super::repo;

pub struct MemoriesService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MemoriesService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn to_response(&self, memory: crate::entity::memory::Model) -> AppResult<MemoryResponse> {
        let asset_ids = repo::asset_ids(&self.ctx.db, memory.id).await?;
        Ok(MemoryResponse {
            id: memory.id,
            owner_id: memory.owner_id,
            r#type: memory.r#type,
            data: memory.data,
            is_saved: memory.is_saved,
            memory_at: memory.memory_at,
            seen_at: memory.seen_at,
            asset_ids,
        })
    }

    async fn owned(&self, id: Uuid, owner_id: Uuid) -> AppResult<crate::entity::memory::Model> {
        let memory = repo::find(&self.ctx.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("memory".into()))?;
        if memory.owner_id != owner_id {
            return Err(AppError::Forbidden);
        }
        Ok(memory)
    }

    pub async fn list(&self, owner_id: Uuid) -> AppResult<Vec<MemoryResponse>> {
        let mut out = Vec::new();
        for memory in repo::list_for_user(&self.ctx.db, owner_id).await? {
            out.push(self.to_response(memory).await?);
        }
        Ok(out)
    }

    pub async fn get(&self, id: Uuid, owner_id: Uuid) -> AppResult<MemoryResponse> {
        let memory = self.owned(id, owner_id).await?;
        self.to_response(memory).await
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        r#type: String,
        data: serde_json::Value,
        memory_at: chrono::DateTime<chrono::FixedOffset>,
        is_saved: bool,
        asset_ids: &[Uuid],
    ) -> AppResult<MemoryResponse> {
        let memory = repo::create(&self.ctx.db, owner_id, r#type, data, memory_at, is_saved, asset_ids).await?;
        self.to_response(memory).await
    }

    pub async fn update(&self, id: Uuid, owner_id: Uuid, patch: MemoryPatch) -> AppResult<MemoryResponse> {
        let memory = self.owned(id, owner_id).await?;
        let updated = repo::update(&self.ctx.db, memory, &patch).await?;
        self.to_response(updated).await
    }

    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<()> {
        self.owned(id, owner_id).await?;
        repo::delete(&self.ctx.db, id).await
    }

    pub async fn add_assets(&self, id: Uuid, owner_id: Uuid, asset_ids: &[Uuid]) -> AppResult<u64> {
        self.owned(id, owner_id).await?;
        repo::add_assets(&self.ctx.db, id, asset_ids).await
    }

    pub async fn remove_assets(&self, id: Uuid, owner_id: Uuid, asset_ids: &[Uuid]) -> AppResult<u64> {
        self.owned(id, owner_id).await?;
        repo::remove_assets(&self.ctx.db, id, asset_ids).await
    }
}
