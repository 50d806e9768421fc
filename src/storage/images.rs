//! Image validation for medication card attachments
//!
//! Checks run in a fixed order so the cheapest rejection wins: existence,
//! file size, decodability and format, then pixel dimensions.

use std::fs;
use std::path::Path;

use image::{GenericImageView, ImageFormat};

use crate::error::{MedLogError, MedLogResult};

/// Largest accepted image file (10 MiB)
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Largest accepted width or height in pixels
pub const MAX_IMAGE_DIMENSION: u32 = 4000;

/// Details of an image that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: &'static str,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

/// Display name of a supported format, `None` for anything else
fn supported_format_name(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("JPEG"),
        ImageFormat::Png => Some("PNG"),
        ImageFormat::Gif => Some("GIF"),
        ImageFormat::Bmp => Some("BMP"),
        ImageFormat::Tiff => Some("TIFF"),
        ImageFormat::WebP => Some("WEBP"),
        _ => None,
    }
}

/// Validate an image file before it is copied into the card store
pub fn validate_image(path: &Path) -> MedLogResult<ImageInfo> {
    if !path.is_file() {
        return Err(MedLogError::file_not_found(path.display().to_string()));
    }

    let size_bytes = fs::metadata(path)
        .map_err(|e| MedLogError::Io(format!("Failed to stat {}: {}", path.display(), e)))?
        .len();
    if size_bytes > MAX_IMAGE_BYTES {
        return Err(MedLogError::Validation(format!(
            "Image file too large: {:.2} MB (max 10 MB)",
            size_bytes as f64 / (1024.0 * 1024.0)
        )));
    }

    let bytes = fs::read(path)
        .map_err(|e| MedLogError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    let format = image::guess_format(&bytes).map_err(|e| {
        MedLogError::Validation(format!("Invalid or corrupted image file: {}", e))
    })?;
    let format_name = supported_format_name(format).ok_or_else(|| {
        MedLogError::Validation(format!(
            "Unsupported image format: {:?}. Supported: BMP, GIF, JPEG, PNG, TIFF, WEBP",
            format
        ))
    })?;

    let decoded = image::load_from_memory_with_format(&bytes, format).map_err(|e| {
        MedLogError::Validation(format!("Invalid or corrupted image file: {}", e))
    })?;

    let (width, height) = decoded.dimensions();
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(MedLogError::Validation(format!(
            "Image dimensions too large: {}x{} (max {}x{})",
            width, height, MAX_IMAGE_DIMENSION, MAX_IMAGE_DIMENSION
        )));
    }

    Ok(ImageInfo {
        format: format_name,
        width,
        height,
        size_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn test_valid_png() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pill.png");
        RgbImage::from_pixel(40, 20, Rgb([200u8, 10, 10]))
            .save(&path)
            .unwrap();

        let info = validate_image(&path).unwrap();
        assert_eq!(info.format, "PNG");
        assert_eq!((info.width, info.height), (40, 20));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = validate_image(&temp_dir.path().join("nope.png")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_non_image_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.png");
        fs::write(&path, "definitely not pixels").unwrap();

        assert!(validate_image(&path).unwrap_err().is_validation());
    }

    #[test]
    fn test_oversized_file_rejected_before_decode() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("huge.png");
        let file = fs::File::create(&path).unwrap();
        file.set_len(MAX_IMAGE_BYTES + 1).unwrap();

        let err = validate_image(&path).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wide.png");
        RgbImage::new(MAX_IMAGE_DIMENSION + 1, 1).save(&path).unwrap();

        let err = validate_image(&path).unwrap_err();
        assert!(err.to_string().contains("dimensions too large"));
    }
}
