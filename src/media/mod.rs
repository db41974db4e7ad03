//! Artifact probing: resolves an artifact reference to decoded image metadata.

use std::io;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::geometry::ImageSize;

pub type MediaResult<T> = std::result::Result<T, DecodeError>;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read file: {0}")]
    FileRead(#[from] io::Error),
    #[error("failed to decode image: {message}")]
    ImageDecode { message: String },
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Metadata for a loaded artifact, shaped for UI status consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub file_size_bytes: u64,
    pub file_name: String,
    pub file_path: String,
    pub needs_conversion: bool,
}

impl ImageInfo {
    pub const fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }
}

/// Seam between the session and whatever holds the pixels. Artifact
/// references are opaque strings; the default implementation treats them as
/// filesystem paths.
pub trait ImageProbe {
    fn probe(&self, artifact_ref: &str) -> MediaResult<ImageInfo>;
}

fn detect_format(path: &Path) -> MediaResult<(String, bool)> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    // TIFF decodes fine but browsers cannot display it, so it needs a
    // conversion pass before the display URL is usable.
    match ext.as_str() {
        "jpg" | "jpeg" => Ok(("JPEG".into(), false)),
        "png" => Ok(("PNG".into(), false)),
        "webp" => Ok(("WebP".into(), false)),
        "avif" => Ok(("AVIF".into(), false)),
        "gif" => Ok(("GIF".into(), false)),
        "bmp" => Ok(("BMP".into(), false)),
        "tiff" | "tif" => Ok(("TIFF".into(), true)),
        other => Err(DecodeError::UnsupportedFormat(other.to_string())),
    }
}

/// Probes artifacts on the local filesystem via the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageProbe;

impl ImageProbe for FileImageProbe {
    fn probe(&self, artifact_ref: &str) -> MediaResult<ImageInfo> {
        let path = Path::new(artifact_ref);

        let metadata = std::fs::metadata(path)?;
        let (format, needs_conversion) = detect_format(path)?;
        let (width, height) =
            image::image_dimensions(path).map_err(|err| DecodeError::ImageDecode {
                message: err.to_string(),
            })?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(ImageInfo {
            width,
            height,
            format,
            file_size_bytes: metadata.len(),
            file_name,
            file_path: artifact_ref.to_string(),
            needs_conversion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_format_maps_known_extensions() {
        let cases = [
            ("test.jpg", "JPEG", false),
            ("test.jpeg", "JPEG", false),
            ("test.png", "PNG", false),
            ("test.webp", "WebP", false),
            ("test.gif", "GIF", false),
            ("test.bmp", "BMP", false),
            ("test.avif", "AVIF", false),
            ("test.tiff", "TIFF", true),
            ("test.tif", "TIFF", true),
        ];
        for (name, expected_format, expected_conversion) in cases {
            let (format, needs_conversion) = detect_format(Path::new(name)).unwrap();
            assert_eq!(format, expected_format, "format for {name}");
            assert_eq!(needs_conversion, expected_conversion, "conversion for {name}");
        }
    }

    #[test]
    fn detect_format_rejects_unknown_extension() {
        let err = detect_format(Path::new("test.xyz")).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat(ext) if ext == "xyz"));
    }

    #[test]
    fn probe_missing_file_is_a_decode_failure() {
        let result = FileImageProbe.probe("/nonexistent/file.png");
        assert!(result.is_err());
    }

    #[test]
    fn probe_reads_dimensions_of_real_png() {
        let path = std::env::temp_dir().join("pixelforge_probe_test.png");
        image::RgbaImage::new(3, 2).save(&path).unwrap();

        let info = FileImageProbe.probe(&path.to_string_lossy()).unwrap();
        assert_eq!(info.width, 3);
        assert_eq!(info.height, 2);
        assert_eq!(info.format, "PNG");
        assert!(!info.needs_conversion);
        assert!(info.file_size_bytes > 0);
        assert_eq!(info.file_name, "pixelforge_probe_test.png");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn image_info_serializes_camel_case_for_ui() {
        let info = ImageInfo {
            width: 10,
            height: 20,
            format: "PNG".into(),
            file_size_bytes: 5,
            file_name: "a.png".into(),
            file_path: "/a.png".into(),
            needs_conversion: false,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["fileSizeBytes"], 5);
        assert_eq!(json["needsConversion"], false);
    }
}
