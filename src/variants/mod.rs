//! Derivative (thumbnail/preview) generation port (§2 item 5, §4.4 step 8).
//!
//! Out of scope per spec.md §1 as a component to design carefully — the
//! production adapter is a thin wrapper around the `image` crate, grounded in
//! the thumbnail-generation idiom from the pack's media-import pipelines.

use async_trait::async_trait;
use image::imageops::FilterType;
use image::ImageFormat;
use thiserror::Error;
use std::io::Cursor;

pub const THUMBNAIL_EDGE: u32 = 250;
pub const PREVIEW_LONGEST_EDGE: u32 = 1440;
pub const PREVIEW_QUALITY: u8 = 80;

#[derive(Debug, Error)]
pub enum VariantsError {
    #[error("unsupported or corrupt image data: {0}")]
    Decode(String),
    #[error("failed to encode derivative: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Copy)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[async_trait]
pub trait Variants: Send + Sync {
    /// Produces a square-ish `THUMBNAIL_EDGE`-px thumbnail, a
    /// `PREVIEW_LONGEST_EDGE`-px-longest-edge preview, and the source image's
    /// own dimensions, all from the original byte buffer.
    async fn generate(&self, bytes: &[u8]) -> Result<GeneratedVariants, VariantsError>;
}

pub struct GeneratedVariants {
    pub thumbnail_webp: Vec<u8>,
    pub preview_webp: Vec<u8>,
    pub dimensions: Dimensions,
}

/// Production adapter backed by the `image` crate. Decoding/encoding is CPU
/// bound, so it runs on a blocking thread via `tokio::task::spawn_blocking`.
pub struct ImageVariants;

impl ImageVariants {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageVariants {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Variants for ImageVariants {
    async fn generate(&self, bytes: &[u8]) -> Result<GeneratedVariants, VariantsError> {
        let owned = bytes.to_vec();
        tokio::task::spawn_blocking(move || generate_sync(&owned))
            .await
            .map_err(|e| VariantsError::Decode(e.to_string()))?
    }
}

fn generate_sync(bytes: &[u8]) -> Result<GeneratedVariants, VariantsError> {
    let img = image::load_from_memory(bytes).map_err(|e| VariantsError::Decode(e.to_string()))?;
    let (width, height) = (img.width(), img.height());

    let thumbnail = img.resize_to_fill(THUMBNAIL_EDGE, THUMBNAIL_EDGE, FilterType::Lanczos3);
    let thumbnail_webp = encode_webp(&thumbnail)?;

    let longest_edge = width.max(height);
    let preview = if longest_edge > PREVIEW_LONGEST_EDGE {
        let scale = PREVIEW_LONGEST_EDGE as f64 / longest_edge as f64;
        let preview_w = (width as f64 * scale).round().max(1.0) as u32;
        let preview_h = (height as f64 * scale).round().max(1.0) as u32;
        img.resize(preview_w, preview_h, FilterType::Lanczos3)
    } else {
        img.clone()
    };
    let preview_webp = encode_webp(&preview)?;

    Ok(GeneratedVariants {
        thumbnail_webp,
        preview_webp,
        dimensions: Dimensions { width, height },
    })
}

fn encode_webp(img: &image::DynamicImage) -> Result<Vec<u8>, VariantsError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::WebP)
        .map_err(|e| VariantsError::Encode(e.to_string()))?;
    Ok(buf.into_inner())
}

#[cfg(any(test, feature = "test-helpers"))]
pub mod fake {
    use super::*;

    /// Returns fixed-size placeholder bytes regardless of input; avoids
    /// pulling the `image` codec path into fast unit tests.
    pub struct FakeVariants {
        pub dimensions: Dimensions,
    }

    impl Default for FakeVariants {
        fn default() -> Self {
            Self {
                dimensions: Dimensions { width: 1024, height: 768 },
            }
        }
    }

    #[async_trait]
    impl Variants for FakeVariants {
        async fn generate(&self, _bytes: &[u8]) -> Result<GeneratedVariants, VariantsError> {
            Ok(GeneratedVariants {
                thumbnail_webp: b"fake-thumbnail".to_vec(),
                preview_webp: b"fake-preview".to_vec(),
                dimensions: self.dimensions,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(width, height);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[tokio::test]
    async fn generate_produces_expected_thumbnail_edge() {
        let variants = ImageVariants::new();
        let bytes = sample_png_bytes(800, 600);
        let out = variants.generate(&bytes).await.unwrap();

        assert_eq!(out.dimensions.width, 800);
        assert_eq!(out.dimensions.height, 600);

        let thumb = image::load_from_memory(&out.thumbnail_webp).unwrap();
        assert_eq!(thumb.width(), THUMBNAIL_EDGE);
        assert_eq!(thumb.height(), THUMBNAIL_EDGE);
    }

    #[tokio::test]
    async fn generate_caps_preview_longest_edge() {
        let variants = ImageVariants::new();
        let bytes = sample_png_bytes(4000, 2000);
        let out = variants.generate(&bytes).await.unwrap();

        let preview = image::load_from_memory(&out.preview_webp).unwrap();
        assert_eq!(preview.width(), PREVIEW_LONGEST_EDGE);
        assert_eq!(preview.height(), PREVIEW_LONGEST_EDGE / 2);
    }

    #[tokio::test]
    async fn generate_rejects_corrupt_bytes() {
        let variants = ImageVariants::new();
        let err = variants.generate(b"not-an-image").await.unwrap_err();
        assert!(matches!(err, VariantsError::Decode(_)));
    }
}
