//! Timeline/View (§4.7): month-bucket aggregation, columnar bucket
//! expansion, folder browser, random sampler.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use uuid::Uuid;

use crate::entity::asset::AssetVisibility;

/// What a bucket/folder query is scoped to. `Album` is an alternate scope —
/// someone else's shared album, not an intersection with the caller's own
/// assets — access to it is checked by the route layer via `AccessGuard`
/// before this module ever runs a query.
#[derive(Debug, Clone, Copy)]
pub enum TimelineScope {
    Owner(Uuid),
    Album(Uuid),
}

#[derive(Debug, Clone)]
pub struct TimeBucketFilters {
    pub scope: TimelineScope,
    pub tag_id: Option<Uuid>,
    pub is_favorite: Option<bool>,
    pub visibility: Vec<AssetVisibility>,
}

impl TimeBucketFilters {
    pub fn visibility_strings(&self) -> Vec<String> {
        self.visibility.iter().map(visibility_str).collect()
    }
}

pub fn visibility_str(v: &AssetVisibility) -> String {
    match v {
        AssetVisibility::Timeline => "timeline",
        AssetVisibility::Archive => "archive",
        AssetVisibility::Hidden => "hidden",
        AssetVisibility::Locked => "locked",
    }
    .to_string()
}

/// `visibility ∈ {timeline, archive, locked}` per §4.7; `hidden` assets
/// (face-review stash) never surface in the timeline unless asked for
/// explicitly by tag/album scope.
pub fn default_visibility_filter() -> Vec<AssetVisibility> {
    vec![AssetVisibility::Timeline, AssetVisibility::Archive]
}

#[derive(Debug, Clone, Copy)]
pub enum BucketOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeBucket {
    #[serde(rename = "timeBucket")]
    pub time_bucket: String,
    pub count: i64,
}

/// One raw row pulled from the `assets` ⋈ `asset_exif` join, before it's
/// folded into `TimeBucketAssets`'s columns.
#[derive(Debug, Clone, sea_orm::FromQueryResult)]
pub struct BucketRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub is_favorite: bool,
    pub visibility: String,
    pub status: String,
    pub r#type: String,
    pub thumbhash: Option<Vec<u8>>,
    pub file_created_at: chrono::DateTime<chrono::FixedOffset>,
    pub local_date_time: chrono::DateTime<chrono::FixedOffset>,
    pub duration_in_seconds: Option<f64>,
    pub live_photo_video_id: Option<Uuid>,
    pub time_zone: Option<String>,
    pub projection_type: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Columnar (struct-of-arrays) response for one month bucket. Field order
/// matches §4.7's list; every `Vec` has the same length — built for
/// incremental grid rendering on mobile, not for ergonomic server-side use.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimeBucketAssets {
    pub id: Vec<Uuid>,
    #[serde(rename = "ownerId")]
    pub owner_id: Vec<Uuid>,
    pub ratio: Vec<f64>,
    #[serde(rename = "isFavorite")]
    pub is_favorite: Vec<bool>,
    pub visibility: Vec<String>,
    #[serde(rename = "isTrashed")]
    pub is_trashed: Vec<bool>,
    #[serde(rename = "isImage")]
    pub is_image: Vec<bool>,
    pub thumbhash: Vec<Option<String>>,
    #[serde(rename = "fileCreatedAt")]
    pub file_created_at: Vec<String>,
    #[serde(rename = "localOffsetHours")]
    pub local_offset_hours: Vec<f64>,
    pub duration: Vec<Option<f64>>,
    #[serde(rename = "projectionType")]
    pub projection_type: Vec<Option<String>>,
    #[serde(rename = "livePhotoVideoId")]
    pub live_photo_video_id: Vec<Option<Uuid>>,
    pub city: Vec<Option<String>>,
    pub country: Vec<Option<String>>,
    pub latitude: Vec<Option<f64>>,
    pub longitude: Vec<Option<f64>>,
}

impl TimeBucketAssets {
    pub fn push(&mut self, row: BucketRow) {
        self.id.push(row.id);
        self.owner_id.push(row.owner_id);
        self.ratio.push(ratio(row.width, row.height));
        self.is_favorite.push(row.is_favorite);
        self.visibility.push(row.visibility);
        self.is_trashed.push(row.status == "trashed");
        self.is_image.push(row.r#type == "image");
        self.thumbhash.push(row.thumbhash.map(|b| STANDARD.encode(b)));
        self.file_created_at.push(row.file_created_at.to_rfc3339());
        self.local_offset_hours.push(local_offset_hours(
            row.local_date_time,
            row.file_created_at,
            row.time_zone.as_deref(),
        ));
        self.duration.push(row.duration_in_seconds);
        self.projection_type.push(row.projection_type);
        self.live_photo_video_id.push(row.live_photo_video_id);
        self.city.push(row.city);
        self.country.push(row.country);
        self.latitude.push(row.latitude);
        self.longitude.push(row.longitude);
    }
}

/// `ratio = width/height`, clamped to 1 when dimensions are missing or
/// nonsensical.
pub fn ratio(width: Option<i32>, height: Option<i32>) -> f64 {
    match (width, height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => w as f64 / h as f64,
        _ => 1.0,
    }
}

/// `(localDateTime - fileCreatedAt) / 3600000` when a time zone was
/// recorded by the exif extractor; else 0 — there's no basis for an offset
/// without one.
pub fn local_offset_hours(
    local_date_time: chrono::DateTime<chrono::FixedOffset>,
    file_created_at: chrono::DateTime<chrono::FixedOffset>,
    time_zone: Option<&str>,
) -> f64 {
    if time_zone.is_none() {
        return 0.0;
    }
    let millis = (local_date_time.naive_utc() - file_created_at.naive_utc()).num_milliseconds();
    millis as f64 / 3_600_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_clamps_to_one_when_dimensions_missing() {
        assert_eq!(ratio(None, Some(100)), 1.0);
        assert_eq!(ratio(Some(100), None), 1.0);
        assert_eq!(ratio(Some(0), Some(100)), 1.0);
    }

    #[test]
    fn ratio_divides_width_by_height() {
        assert_eq!(ratio(Some(4000), Some(3000)), 4000.0 / 3000.0);
    }

    #[test]
    fn local_offset_hours_is_zero_without_a_recorded_time_zone() {
        let t = chrono::DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(local_offset_hours(t, t, None), 0.0);
    }

    #[test]
    fn local_offset_hours_reflects_the_local_vs_utc_gap() {
        let file_created_at = chrono::DateTime::parse_from_rfc3339("2024-01-01T12:00:00Z").unwrap();
        let local_date_time = chrono::DateTime::parse_from_rfc3339("2024-01-01T07:00:00Z").unwrap();
        assert_eq!(local_offset_hours(local_date_time, file_created_at, Some("-05:00")), -5.0);
    }
}
