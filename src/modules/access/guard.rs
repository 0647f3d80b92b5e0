use std::collections::HashSet;

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::modules::auth::domain::{AuthContext, Principal};
use crate::shared::error::{AppError, AppResult};

use super::domain::Permission;
use super::queries;

/// §4.3: chunks large id sets to stay under SQLite's default 999-parameter
/// limit with headroom, even though this deployment targets Postgres — a
/// portable floor rather than a Postgres-specific tuning.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

#[derive(Clone)]
pub struct AccessGuard {
    db: DatabaseConnection,
    chunk_size: usize,
}

impl AccessGuard {
    pub fn new(db: DatabaseConnection, chunk_size: usize) -> Self {
        Self { db, chunk_size }
    }

    /// Returns the subset of `ids` the principal is allowed `permission` on.
    /// The caller's chunk boundaries are never observable in the result.
    pub async fn check_access(
        &self,
        auth: &AuthContext,
        permission: Permission,
        ids: &[Uuid],
    ) -> AppResult<HashSet<Uuid>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }

        if let Some(permissions) = api_key_permissions(auth) {
            if !permissions.iter().any(|p| p == permission.as_str()) {
                return Ok(HashSet::new());
            }
        }

        if let Principal::SharedLink {
            link_id,
            allow_upload,
            allow_download,
            album_id,
            ..
        } = &auth.principal
        {
            if !permission.grantable_to_shared_link(*allow_upload, *allow_download) {
                return Ok(HashSet::new());
            }
            return self.check_via_shared_link(permission, ids, *link_id, *album_id).await;
        }

        let self_id = auth.user_id();
        let elevated = auth.has_elevated_permission;

        let mut allowed = HashSet::new();
        for chunk in ids.chunks(self.chunk_size) {
            let matched = match permission {
                Permission::AssetRead => {
                    queries::asset_read_ids(&self.db, chunk, self_id, elevated).await?
                }
                Permission::AssetUpdate
                | Permission::AssetDelete
                | Permission::AssetShare
                | Permission::AssetReplace
                | Permission::AssetCopy => {
                    queries::asset_owned_ids(&self.db, chunk, self_id, elevated).await?
                }
                Permission::AssetUpload => chunk.to_vec(), // gated by principal kind, not by id
                Permission::AlbumRead => queries::album_read_ids(&self.db, chunk, self_id).await?,
                Permission::AlbumUpdate | Permission::AlbumDelete | Permission::AlbumShare => {
                    queries::album_owned_ids(&self.db, chunk, self_id).await?
                }
                Permission::ActivityCreate => {
                    queries::activity_create_album_ids(&self.db, chunk, self_id).await?
                }
                Permission::PartnerUpdate => {
                    queries::partner_update_ids(&self.db, chunk, self_id).await?
                }
            };
            allowed.extend(matched);
        }

        Ok(allowed)
    }

    async fn check_via_shared_link(
        &self,
        permission: Permission,
        ids: &[Uuid],
        link_id: Uuid,
        album_id: Option<Uuid>,
    ) -> AppResult<HashSet<Uuid>> {
        let mut allowed = HashSet::new();
        for chunk in ids.chunks(self.chunk_size) {
            let matched = match permission {
                Permission::AssetRead => {
                    queries::asset_read_ids_via_link(&self.db, chunk, link_id, album_id).await?
                }
                Permission::AlbumRead => match album_id {
                    Some(aid) => queries::album_read_ids_via_link(&self.db, chunk, aid).await?,
                    None => Vec::new(),
                },
                Permission::AssetUpload => chunk.to_vec(),
                _ => Vec::new(),
            };
            allowed.extend(matched);
        }
        Ok(allowed)
    }

    /// Same as `check_access`, but fails with `Forbidden` unless every id in
    /// `ids` is allowed.
    pub async fn require_access(
        &self,
        auth: &AuthContext,
        permission: Permission,
        ids: &[Uuid],
    ) -> AppResult<()> {
        let allowed = self.check_access(auth, permission, ids).await?;
        let requested: HashSet<Uuid> = ids.iter().copied().collect();
        if allowed != requested {
            return Err(AppError::Forbidden);
        }
        Ok(())
    }
}

fn api_key_permissions(auth: &AuthContext) -> Option<&[String]> {
    match &auth.principal {
        Principal::ApiKey { permissions, .. } => Some(permissions.as_slice()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chunk_size_is_under_sqlite_parameter_floor() {
        assert!(DEFAULT_CHUNK_SIZE <= 500);
    }

    #[test]
    fn permission_as_str_matches_grant_string_convention() {
        assert_eq!(Permission::AssetRead.as_str(), "asset.read");
        assert_eq!(Permission::PartnerUpdate.as_str(), "partner.update");
    }
}
