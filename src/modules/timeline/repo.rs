//! Timeline/View (§4.7) queries. Raw SQL in the style of
//! `access::queries` — sea-orm's builder doesn't express the
//! month-truncation grouping or the exif join cleanly, and the folder
//! view's "no deeper subdirectory" rule is a string-prefix predicate SQL
//! is better suited to express directly than a query builder is.

use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait, FromQueryResult, Statement};
use uuid::Uuid;

use crate::entity::asset;
use crate::shared::error::AppResult;

use super::domain::{BucketRow, BucketOrder, TimeBucket, TimeBucketFilters, TimelineScope};

struct ScopeClause {
    sql: &'static str,
    value: sea_orm::Value,
}

fn scope_clause(scope: TimelineScope) -> ScopeClause {
    match scope {
        TimelineScope::Owner(id) => ScopeClause {
            sql: "a.owner_id = $1",
            value: id.into(),
        },
        TimelineScope::Album(id) => ScopeClause {
            sql: "a.id IN (SELECT asset_id FROM album_assets WHERE album_id = $1)",
            value: id.into(),
        },
    }
}

/// Builds the shared `WHERE` clause + positional values for both the
/// bucket-count and bucket-contents queries, so the two stay in sync.
fn base_predicate(filters: &TimeBucketFilters) -> (Vec<String>, Vec<sea_orm::Value>) {
    let scope = scope_clause(filters.scope);
    let mut values = vec![scope.value];
    let mut clauses = vec![scope.sql.to_string(), "a.deleted_at IS NULL".to_string()];

    if let Some(tag_id) = filters.tag_id {
        values.push(tag_id.into());
        clauses.push(format!(
            "a.id IN (SELECT asset_id FROM tag_assets WHERE tag_id = ${})",
            values.len()
        ));
    }
    if let Some(fav) = filters.is_favorite {
        values.push(fav.into());
        clauses.push(format!("a.is_favorite = ${}", values.len()));
    }
    values.push(filters.visibility_strings().into());
    clauses.push(format!("a.visibility::text = ANY(${}::text[])", values.len()));

    (clauses, values)
}

/// `getTimeBuckets`: one row per month with a non-zero count.
pub async fn time_buckets(
    db: &DatabaseConnection,
    filters: &TimeBucketFilters,
    order: BucketOrder,
) -> AppResult<Vec<TimeBucket>> {
    let (clauses, values) = base_predicate(filters);
    let order_sql = match order {
        BucketOrder::Asc => "ASC",
        BucketOrder::Desc => "DESC",
    };

    #[derive(FromQueryResult)]
    struct Row {
        bucket: String,
        count: i64,
    }

    let sql = format!(
        "SELECT date_trunc('month', a.local_date_time)::date::text AS bucket, COUNT(*) AS count \
         FROM assets a WHERE {} GROUP BY bucket ORDER BY bucket {order_sql}",
        clauses.join(" AND "),
    );
    let stmt = Statement::from_sql_and_values(DatabaseBackend::Postgres, &sql, values);
    let rows = Row::find_by_statement(stmt).all(db).await?;
    Ok(rows
        .into_iter()
        .map(|r| TimeBucket { time_bucket: r.bucket, count: r.count })
        .collect())
}

/// `getTimeBucket(timeBucket)`: every asset in one month bucket, as raw
/// rows the service folds into the columnar response.
pub async fn time_bucket_assets(
    db: &DatabaseConnection,
    filters: &TimeBucketFilters,
    bucket: &str,
) -> AppResult<Vec<BucketRow>> {
    let (mut clauses, mut values) = base_predicate(filters);
    values.push(bucket.to_string().into());
    clauses.push(format!(
        "date_trunc('month', a.local_date_time)::date::text = ${}",
        values.len()
    ));

    let sql = format!(
        "SELECT a.id, a.owner_id, a.width, a.height, a.is_favorite, \
                a.visibility::text AS visibility, a.status::text AS status, a.type::text AS type, \
                a.thumbhash, a.file_created_at, a.local_date_time, a.duration_in_seconds, \
                a.live_photo_video_id, e.time_zone, e.projection_type, e.city, e.country, \
                e.latitude, e.longitude \
         FROM assets a LEFT JOIN asset_exif e ON e.asset_id = a.id \
         WHERE {} ORDER BY a.file_created_at DESC",
        clauses.join(" AND "),
    );
    let stmt = Statement::from_sql_and_values(DatabaseBackend::Postgres, &sql, values);
    Ok(BucketRow::find_by_statement(stmt).all(db).await?)
}

/// `getUniqueOriginalPaths`: distinct directory prefixes (the path up to
/// and including the final slash) of the user's assets.
pub async fn unique_original_paths(db: &DatabaseConnection, owner_id: Uuid) -> AppResult<Vec<String>> {
    #[derive(FromQueryResult)]
    struct Row {
        prefix: String,
    }
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        r#"
        SELECT DISTINCT substring(original_path from '^(.*/)') AS prefix
        FROM assets
        WHERE owner_id = $1 AND deleted_at IS NULL AND status != 'deleted' AND original_path LIKE '%/%'
        "#,
        vec![owner_id.into()],
    );
    let rows = Row::find_by_statement(stmt).all(db).await?;
    Ok(rows.into_iter().map(|r| r.prefix).collect())
}

/// `getAssetsByOriginalPath(path)`: assets directly under `path`, not in any
/// deeper subdirectory — the portion of `originalPath` after the prefix
/// must not itself contain a `/`.
pub async fn assets_by_original_path(
    db: &DatabaseConnection,
    owner_id: Uuid,
    path: &str,
) -> AppResult<Vec<asset::Model>> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        r#"
        SELECT * FROM assets
        WHERE owner_id = $1
          AND deleted_at IS NULL
          AND status != 'deleted'
          AND original_path LIKE $2 || '%'
          AND position('/' in substring(original_path from length($2) + 1)) = 0
        ORDER BY file_created_at DESC
        "#,
        vec![owner_id.into(), path.to_string().into()],
    );
    Ok(asset::Entity::find().from_raw_sql(stmt).all(db).await?)
}

/// `getRandom(count)`: DB-side random ordering over the caller's
/// visible-user set, excluding hidden/trashed/deleted assets.
pub async fn random_assets(
    db: &DatabaseConnection,
    visible_owner_ids: &[Uuid],
    count: u64,
) -> AppResult<Vec<asset::Model>> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        r#"
        SELECT * FROM assets
        WHERE owner_id = ANY($1)
          AND deleted_at IS NULL
          AND status = 'active'
          AND visibility != 'hidden'
        ORDER BY random()
        LIMIT $2
        "#,
        vec![visible_owner_ids.to_vec().into(), (count as i64).into()],
    );
    Ok(asset::Entity::find().from_raw_sql(stmt).all(db).await?)
}
