//! Raw SQL behind AccessGuard. Sea-orm's query builder doesn't express these
//! unions cleanly, so — grounded in the teacher's `media_query_postgres.rs`
//! — these go through `Statement::from_sql_and_values` directly.

use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, FromQueryResult, Statement};
use uuid::Uuid;

use crate::shared::error::AppResult;

#[derive(Debug, FromQueryResult)]
struct IdRow {
    id: Uuid,
}

async fn ids_from(db: &DatabaseConnection, stmt: Statement) -> AppResult<Vec<Uuid>> {
    let rows = IdRow::find_by_statement(stmt).all(db).await?;
    Ok(rows.into_iter().map(|r| r.id).collect())
}

/// Asset ids in `ids` the user owns. Trashed assets are included (owner can
/// always see their own trash); locked assets require `elevated`.
pub async fn asset_owned_ids(
    db: &DatabaseConnection,
    ids: &[Uuid],
    self_id: Uuid,
    elevated: bool,
) -> AppResult<Vec<Uuid>> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        r#"
        SELECT id FROM assets
        WHERE id = ANY($1)
          AND owner_id = $2
          AND status != 'deleted'
          AND (visibility != 'locked' OR $3)
        "#,
        vec![ids.to_vec().into(), self_id.into(), elevated.into()],
    );
    ids_from(db, stmt).await
}

/// Full `asset.read` union (§4.3) for a logged-in user or API-key principal:
/// own assets, assets in an album the user owns or is a member of, and
/// assets of a partner who shares with `self_id` (timeline/hidden only).
/// Trashed assets are filtered out of the cross-user branches.
pub async fn asset_read_ids(
    db: &DatabaseConnection,
    ids: &[Uuid],
    self_id: Uuid,
    elevated: bool,
) -> AppResult<Vec<Uuid>> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        r#"
        SELECT a.id FROM assets a
        WHERE a.id = ANY($1)
          AND (a.visibility != 'locked' OR $3)
          AND (
            (a.owner_id = $2 AND a.status != 'deleted')
            OR (
              a.status != 'deleted' AND a.deleted_at IS NULL AND (
                a.id IN (
                  SELECT aa.asset_id FROM album_assets aa
                  JOIN albums al ON al.id = aa.album_id
                  WHERE al.owner_id = $2
                     OR al.id IN (SELECT au.album_id FROM album_users au WHERE au.user_id = $2)
                )
                OR (
                  a.owner_id IN (SELECT p.shared_by_id FROM partners p WHERE p.shared_with_id = $2)
                  AND a.visibility IN ('timeline', 'hidden')
                )
              )
            )
          )
        "#,
        vec![ids.to_vec().into(), self_id.into(), elevated.into()],
    );
    ids_from(db, stmt).await
}

/// `asset.read` reachable through a specific shared link: either the link
/// directly enumerates the asset, or the link points at an album containing it.
pub async fn asset_read_ids_via_link(
    db: &DatabaseConnection,
    ids: &[Uuid],
    link_id: Uuid,
    album_id: Option<Uuid>,
) -> AppResult<Vec<Uuid>> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        r#"
        SELECT a.id FROM assets a
        WHERE a.id = ANY($1)
          AND a.status = 'active'
          AND (
            a.id IN (SELECT sla.asset_id FROM shared_link_assets sla WHERE sla.shared_link_id = $2)
            OR ($3::uuid IS NOT NULL AND a.id IN (
              SELECT aa.asset_id FROM album_assets aa WHERE aa.album_id = $3
            ))
          )
        "#,
        vec![ids.to_vec().into(), link_id.into(), album_id.into()],
    );
    ids_from(db, stmt).await
}

pub async fn album_owned_ids(
    db: &DatabaseConnection,
    ids: &[Uuid],
    self_id: Uuid,
) -> AppResult<Vec<Uuid>> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        r#"SELECT id FROM albums WHERE id = ANY($1) AND owner_id = $2"#,
        vec![ids.to_vec().into(), self_id.into()],
    );
    ids_from(db, stmt).await
}

/// `album.read`: owner, member, or reachable via a shared link pointing
/// directly at the album.
pub async fn album_read_ids(
    db: &DatabaseConnection,
    ids: &[Uuid],
    self_id: Uuid,
) -> AppResult<Vec<Uuid>> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        r#"
        SELECT al.id FROM albums al
        WHERE al.id = ANY($1)
          AND (
            al.owner_id = $2
            OR al.id IN (SELECT au.album_id FROM album_users au WHERE au.user_id = $2)
          )
        "#,
        vec![ids.to_vec().into(), self_id.into()],
    );
    ids_from(db, stmt).await
}

pub async fn album_read_ids_via_link(
    db: &DatabaseConnection,
    ids: &[Uuid],
    link_album_id: Uuid,
) -> AppResult<Vec<Uuid>> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        r#"SELECT id FROM albums WHERE id = ANY($1) AND id = $2"#,
        vec![ids.to_vec().into(), link_album_id.into()],
    );
    ids_from(db, stmt).await
}

/// `activity.create`: album must have activity enabled and the caller must
/// be its owner or a member.
pub async fn activity_create_album_ids(
    db: &DatabaseConnection,
    ids: &[Uuid],
    self_id: Uuid,
) -> AppResult<Vec<Uuid>> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        r#"
        SELECT al.id FROM albums al
        WHERE al.id = ANY($1)
          AND al.is_activity_enabled
          AND (
            al.owner_id = $2
            OR al.id IN (SELECT au.album_id FROM album_users au WHERE au.user_id = $2)
          )
        "#,
        vec![ids.to_vec().into(), self_id.into()],
    );
    ids_from(db, stmt).await
}

/// The caller's visible-user set for timeline-style aggregate views (§4.7):
/// self plus every partner who shares with the caller with `inTimeline` set.
pub async fn visible_owner_ids(db: &DatabaseConnection, self_id: Uuid) -> AppResult<Vec<Uuid>> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        r#"
        SELECT $1::uuid AS id
        UNION
        SELECT shared_by_id AS id FROM partners WHERE shared_with_id = $1 AND in_timeline
        "#,
        vec![self_id.into()],
    );
    ids_from(db, stmt).await
}

/// `partner.update`: `ids` are the `sharedById` side of the partnership; the
/// caller must be the `sharedWithId`.
pub async fn partner_update_ids(
    db: &DatabaseConnection,
    ids: &[Uuid],
    self_id: Uuid,
) -> AppResult<Vec<Uuid>> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        r#"
        SELECT shared_by_id AS id FROM partners
        WHERE shared_by_id = ANY($1) AND shared_with_id = $2
        "#,
        vec![ids.to_vec().into(), self_id.into()],
    );
    ids_from(db, stmt).await
}
