use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage, ExtendedColorType, ImageEncoder};

use crate::constants::{DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY};
use crate::errors::AppError;

const DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// Lossy quality in (0, 1].
    pub quality: f32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        NormalizeOptions {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl NormalizeOptions {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(AppError::validation("bounds", "Maximum dimensions must be greater than zero"));
        }
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(AppError::validation("quality", "Quality must be greater than 0 and at most 1"));
        }
        Ok(())
    }

    fn jpeg_quality(&self) -> u8 {
        (self.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

/// Clamps the longer edge to its bound and derives the other edge from the aspect ratio.
///
/// Squares count as landscape. The derived edge is not clamped again, so a wide image
/// that is also very tall can keep a height above `max_height`. Fractional sizes truncate.
pub fn target_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width >= height {
        if width > max_width {
            let scaled = (u64::from(height) * u64::from(max_width) / u64::from(width)) as u32;
            return (max_width, scaled.max(1));
        }
    } else if height > max_height {
        let scaled = (u64::from(width) * u64::from(max_height) / u64::from(height)) as u32;
        return (scaled.max(1), max_height);
    }

    (width, height)
}

pub fn decode(bytes: &[u8]) -> Result<DynamicImage, AppError> {
    image::load_from_memory(bytes).map_err(|e| match e {
        image::ImageError::IoError(io) => AppError::IoError(io.to_string()),
        other => AppError::DecodeError(other.to_string()),
    })
}

fn render(image: DynamicImage, width: u32, height: u32) -> DynamicImage {
    if image.width() == width && image.height() == height {
        return image;
    }
    image.resize_exact(width, height, FilterType::CatmullRom)
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, AppError> {
    // JPEG has no alpha channel
    let rgb = image.to_rgb8();
    let mut output = Vec::new();
    JpegEncoder::new_with_quality(&mut output, quality)
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| AppError::InternalError(format!("JPEG encoding failed: {}", e)))?;
    Ok(output)
}

/// Synchronous core of the normalizer. Prefer [`normalize_bytes`] from async code.
pub fn normalize_blocking(bytes: &[u8], options: &NormalizeOptions) -> Result<String, AppError> {
    options.validate()?;

    let image = decode(bytes)?;
    let (width, height) = target_dimensions(image.width(), image.height(), options.max_width, options.max_height);

    tracing::debug!(
        source_width = image.width(),
        source_height = image.height(),
        width,
        height,
        "normalizing image"
    );

    let rendered = render(image, width, height);
    let encoded = encode_jpeg(&rendered, options.jpeg_quality())?;

    Ok(format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(encoded)))
}

pub async fn normalize_bytes(bytes: Vec<u8>, options: NormalizeOptions) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || normalize_blocking(&bytes, &options)).await?
}

pub async fn normalize_file(path: impl AsRef<Path>, options: NormalizeOptions) -> Result<String, AppError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::IoError(format!("{}: {}", path.display(), e)))?;
    normalize_bytes(bytes, options).await
}

/// Raw JPEG bytes behind a normalized data URI.
pub fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>, AppError> {
    let payload = data_uri
        .strip_prefix(DATA_URI_PREFIX)
        .ok_or_else(|| AppError::InvalidInput("Not a JPEG data URI".to_string()))?;
    STANDARD
        .decode(payload)
        .map_err(|e| AppError::DecodeError(e.to_string()))
}
