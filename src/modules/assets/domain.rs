use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::entity::asset::{AssetStatus, AssetType, AssetVisibility};

/// Fields supplied by the client on upload (§4.4 step 6), independent of the
/// file bytes themselves.
#[derive(Debug, Clone)]
pub struct NewAssetInput {
    pub device_asset_id: String,
    pub device_id: String,
    pub file_created_at: DateTime<FixedOffset>,
    pub file_modified_at: DateTime<FixedOffset>,
    pub local_date_time: DateTime<FixedOffset>,
    pub is_favorite: bool,
    pub duration_in_seconds: Option<f64>,
    pub original_file_name: String,
}

/// `(dateTimeRelative minutes, timeZone)` from §4.4 "Update metadata — Bulk
/// update": shifts `dateTimeOriginal` by a fixed offset across every affected
/// row, computed SQL-side rather than parsed/re-serialized in Rust.
#[derive(Debug, Clone)]
pub struct RelativeTimeShift {
    pub minutes: f64,
    pub time_zone: String,
}

/// `GET /api/assets/statistics` (§6.2): per-type counts over the caller's
/// own non-deleted assets.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetStatistics {
    pub images: i64,
    pub videos: i64,
    pub total: i64,
}

/// Result of an upload or replace attempt (§4.4 steps 1, 4, 11).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Created(Uuid),
    Duplicate(Uuid),
}

/// `size` query parameter on the thumbnail endpoint (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailSize {
    Thumbnail,
    Preview,
    Fullsize,
}

impl ThumbnailSize {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "thumbnail" => Some(Self::Thumbnail),
            "preview" => Some(Self::Preview),
            "fullsize" => Some(Self::Fullsize),
            _ => None,
        }
    }
}

/// Infers `AssetType` from a file extension. Unknown extensions degrade to
/// `Other` rather than failing the upload (§4.4 step 6: "type inferred from MIME").
pub fn infer_asset_type(filename: &str) -> AssetType {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" | "png" | "webp" | "gif" | "heic" | "heif" | "dng" | "tiff" | "tif" => {
            AssetType::Image
        }
        "mp4" | "mov" | "avi" | "mkv" | "webm" | "3gp" => AssetType::Video,
        "mp3" | "wav" | "flac" | "m4a" | "ogg" => AssetType::Audio,
        _ => AssetType::Other,
    }
}

/// Whether `ext` is one of the browser-natively-renderable image formats
/// (§4.5 thumbnail fallback chain).
pub fn is_web_supported_image(ext: &str) -> bool {
    matches!(
        ext.to_ascii_lowercase().as_str(),
        "jpg" | "jpeg" | "png" | "webp" | "gif"
    )
}

pub fn extension_of(path: &str) -> String {
    path.rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Default visibility for a freshly uploaded asset (§4.4 step 6).
pub fn default_visibility() -> AssetVisibility {
    AssetVisibility::Timeline
}

pub fn default_status() -> AssetStatus {
    AssetStatus::Active
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_asset_type_recognizes_common_extensions() {
        assert_eq!(infer_asset_type("IMG_0001.JPG"), AssetType::Image);
        assert_eq!(infer_asset_type("clip.mov"), AssetType::Video);
        assert_eq!(infer_asset_type("track.flac"), AssetType::Audio);
        assert_eq!(infer_asset_type("notes.txt"), AssetType::Other);
    }

    #[test]
    fn web_supported_image_excludes_raw_formats() {
        assert!(is_web_supported_image("PNG"));
        assert!(!is_web_supported_image("dng"));
    }
}
