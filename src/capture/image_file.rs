//! Pixel buffer → PNG file — functional core plus one write.
//!
//! No clipboard access here. Raw RGBA bytes come in, a PNG lands on disk.

use image::{ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};

/// Wraps raw RGBA bytes in an `RgbaImage`.
///
/// Fails if the buffer length does not match `width * height * 4`.
pub fn image_from_rgba(
    width: usize,
    height: usize,
    bytes: Vec<u8>,
) -> Result<RgbaImage, ImageFileError> {
    if width == 0 || height == 0 {
        return Err(ImageFileError::ZeroDimension);
    }

    let (w, h) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(ImageFileError::TooLarge { width, height }),
    };

    let actual = bytes.len();
    RgbaImage::from_raw(w, h, bytes).ok_or(ImageFileError::BufferMismatch {
        width,
        height,
        actual,
    })
}

/// Encodes `image` as PNG at `path`, replacing any existing file.
pub fn write_png(image: &RgbaImage, path: &Path) -> Result<(), ImageFileError> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| ImageFileError::EncodingFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

#[derive(Debug, thiserror::Error)]
pub enum ImageFileError {
    #[error("Clipboard image has zero width or height")]
    ZeroDimension,

    #[error("Clipboard image {width}x{height} is too large")]
    TooLarge { width: usize, height: usize },

    #[error("Clipboard image {width}x{height} came with {actual} bytes of RGBA data")]
    BufferMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },

    #[error("PNG encoding to {} failed: {reason}", path.display())]
    EncodingFailed { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_matching_buffer() {
        let img = image_from_rgba(4, 3, vec![0u8; 4 * 3 * 4]).unwrap();
        assert_eq!(img.dimensions(), (4, 3));
    }

    #[test]
    fn short_buffer_fails() {
        let result = image_from_rgba(4, 3, vec![0u8; 10]);
        assert!(matches!(
            result,
            Err(ImageFileError::BufferMismatch { actual: 10, .. })
        ));
    }

    #[test]
    fn zero_dimension_fails() {
        let result = image_from_rgba(0, 3, Vec::new());
        assert!(matches!(result, Err(ImageFileError::ZeroDimension)));
    }

    #[test]
    fn writes_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let img = image_from_rgba(2, 2, vec![255u8; 16]).unwrap();

        write_png(&img, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // PNG magic bytes
        assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn missing_parent_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.png");
        let img = image_from_rgba(1, 1, vec![0u8; 4]).unwrap();
        assert!(matches!(
            write_png(&img, &path),
            Err(ImageFileError::EncodingFailed { .. })
        ));
    }
}
