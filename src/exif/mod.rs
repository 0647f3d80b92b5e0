//! EXIF/metadata extraction port (§2 item 4, §6.3 `AssetExifV1`).
//!
//! Failures here are always best-effort: ingest degrades to storing only the
//! byte length rather than surfacing an error (§4.4 step 7).

use chrono::{DateTime, FixedOffset, Utc};

/// Normalized subset of `AssetExifV1` that can be derived from a byte buffer
/// alone. Fields that need external data (reverse geocoding for
/// city/state/country, video probing for fps, live-photo pairing) are left
/// for the caller to fill in separately and are not part of this trait.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExifRecord {
    pub file_size_in_byte: i64,
    pub make: Option<String>,
    pub model: Option<String>,
    pub lens_model: Option<String>,
    pub exif_image_width: Option<i32>,
    pub exif_image_height: Option<i32>,
    pub orientation: Option<String>,
    pub date_time_original: Option<DateTime<Utc>>,
    pub modify_date: Option<DateTime<Utc>>,
    pub time_zone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub exposure_time: Option<String>,
    pub iso: Option<i32>,
    pub f_number: Option<f64>,
    pub focal_length: Option<f64>,
    pub description: Option<String>,
    pub rating: Option<i32>,
}

pub trait ExifExtractor: Send + Sync {
    /// Parses `bytes` (the full original file) and returns whatever EXIF
    /// fields could be recovered. Never fails outright; an unparsable or
    /// non-image buffer yields a record with only `file_size_in_byte` set.
    fn extract(&self, bytes: &[u8]) -> ExifRecord;
}

/// Production adapter backed by `kamadak-exif`.
pub struct KamadakExifExtractor;

impl KamadakExifExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for KamadakExifExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ExifExtractor for KamadakExifExtractor {
    fn extract(&self, bytes: &[u8]) -> ExifRecord {
        let mut record = ExifRecord {
            file_size_in_byte: bytes.len() as i64,
            ..Default::default()
        };

        let mut cursor = std::io::Cursor::new(bytes);
        let exif = match exif::Reader::new().read_from_container(&mut cursor) {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!("exif extraction failed, storing byte length only: {err}");
                return record;
            }
        };

        for field in exif.fields() {
            match field.tag {
                exif::Tag::Make => record.make = Some(display_ascii(field)),
                exif::Tag::Model => record.model = Some(display_ascii(field)),
                exif::Tag::LensModel => record.lens_model = Some(display_ascii(field)),
                exif::Tag::PixelXDimension => record.exif_image_width = field_as_i32(field),
                exif::Tag::PixelYDimension => record.exif_image_height = field_as_i32(field),
                exif::Tag::Orientation => record.orientation = Some(display_ascii(field)),
                exif::Tag::DateTimeOriginal => {
                    record.date_time_original = parse_exif_datetime(&display_ascii(field))
                }
                exif::Tag::DateTime => record.modify_date = parse_exif_datetime(&display_ascii(field)),
                exif::Tag::ExposureTime => record.exposure_time = Some(display_ascii(field)),
                exif::Tag::PhotographicSensitivity => record.iso = field_as_i32(field),
                exif::Tag::FNumber => record.f_number = field_as_f64(field),
                exif::Tag::FocalLength => record.focal_length = field_as_f64(field),
                exif::Tag::ImageDescription => record.description = Some(display_ascii(field)),
                exif::Tag::Rating => record.rating = field_as_i32(field),
                _ => {}
            }
        }

        if let (Some(lat), Some(lon)) = (gps_coordinate(&exif, true), gps_coordinate(&exif, false)) {
            record.latitude = Some(lat);
            record.longitude = Some(lon);
        }

        record
    }
}

fn display_ascii(field: &exif::Field) -> String {
    field.display_value().to_string().trim_matches('"').to_string()
}

fn field_as_i32(field: &exif::Field) -> Option<i32> {
    match &field.value {
        exif::Value::Long(v) => v.first().map(|x| *x as i32),
        exif::Value::Short(v) => v.first().map(|x| *x as i32),
        exif::Value::SShort(v) => v.first().map(|x| *x as i32),
        exif::Value::SLong(v) => v.first().copied(),
        exif::Value::Rational(v) => v.first().map(|r| (r.num / r.denom.max(1)) as i32),
        _ => None,
    }
}

fn field_as_f64(field: &exif::Field) -> Option<f64> {
    match &field.value {
        exif::Value::Rational(v) => v.first().map(|r| r.to_f64()),
        exif::Value::SRational(v) => v.first().map(|r| r.to_f64()),
        _ => None,
    }
}

fn gps_coordinate(exif: &exif::Exif, latitude: bool) -> Option<f64> {
    let (coord_tag, ref_tag) = if latitude {
        (exif::Tag::GPSLatitude, exif::Tag::GPSLatitudeRef)
    } else {
        (exif::Tag::GPSLongitude, exif::Tag::GPSLongitudeRef)
    };

    let coord_field = exif.get_field(coord_tag, exif::In::PRIMARY)?;
    let exif::Value::Rational(parts) = &coord_field.value else {
        return None;
    };
    if parts.len() < 3 {
        return None;
    }

    let degrees = parts[0].to_f64() + parts[1].to_f64() / 60.0 + parts[2].to_f64() / 3600.0;

    let sign = exif
        .get_field(ref_tag, exif::In::PRIMARY)
        .map(|f| f.display_value().to_string())
        .map(|s| if s.starts_with('S') || s.starts_with('W') { -1.0 } else { 1.0 })
        .unwrap_or(1.0);

    Some(degrees * sign)
}

fn parse_exif_datetime(raw: &str) -> Option<DateTime<Utc>> {
    // EXIF datetimes are "YYYY:MM:DD HH:MM:SS" with no timezone; treat as UTC.
    let cleaned = raw.trim_matches('"');
    chrono::NaiveDateTime::parse_from_str(cleaned, "%Y:%m:%d %H:%M:%S")
        .ok()
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

#[allow(dead_code)]
fn fixed_offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(minutes * 60)
}

#[cfg(any(test, feature = "test-helpers"))]
pub mod fake {
    use super::*;

    /// Returns a fixed, caller-supplied record regardless of input bytes.
    pub struct FakeExifExtractor(pub ExifRecord);

    impl ExifExtractor for FakeExifExtractor {
        fn extract(&self, bytes: &[u8]) -> ExifRecord {
            let mut record = self.0.clone();
            record.file_size_in_byte = bytes.len() as i64;
            record
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsable_bytes_degrade_to_byte_length_only() {
        let extractor = KamadakExifExtractor::new();
        let record = extractor.extract(b"not an image");
        assert_eq!(record.file_size_in_byte, 12);
        assert!(record.make.is_none());
    }

    #[test]
    fn empty_buffer_does_not_panic() {
        let extractor = KamadakExifExtractor::new();
        let record = extractor.extract(&[]);
        assert_eq!(record.file_size_in_byte, 0);
    }

    #[test]
    fn parse_exif_datetime_accepts_colon_separated_date() {
        let dt = parse_exif_datetime("2024:01:02 03:04:05").unwrap();
        assert_eq!(dt.to_string(), "2024-01-02 03:04:05 UTC");
    }

    #[test]
    fn parse_exif_datetime_rejects_garbage() {
        assert!(parse_exif_datetime("not-a-date").is_none());
    }
}
