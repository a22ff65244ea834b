//! Image files selected for upload.
//!
//! The declared media type is taken from the file extension, the way a file
//! picker reports it. Only `image/png` passes the flows' validation; the
//! content itself is checked by the backend.

use image::ImageFormat;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Media type the backend accepts.
pub const PNG_MEDIA_TYPE: &str = "image/png";

/// Fallback media type for unknown extensions.
const OCTET_STREAM: &str = "application/octet-stream";

/// Errors that can occur when reading an image from disk.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("File has no usable name: {0}")]
    NoFileName(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// An image selected by the user, held in memory until submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl ImageFile {
    /// Creates an image from raw parts.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk and derives its declared media type from the
    /// extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| UploadError::NoFileName(path.display().to_string()))?
            .to_string();
        let bytes = fs::read(path)?;
        let media_type = declared_media_type(path);

        if media_type == PNG_MEDIA_TYPE && !looks_like_png(&bytes) {
            tracing::warn!(file = %name, "file has a .png extension but no PNG signature");
        }

        Ok(Self {
            name,
            media_type,
            bytes,
        })
    }

    /// File name without directories.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared media type.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// File contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// True when the declared media type is exactly `image/png`.
    pub fn is_png(&self) -> bool {
        self.media_type == PNG_MEDIA_TYPE
    }
}

fn declared_media_type(path: &Path) -> String {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| OCTET_STREAM.to_string())
}

fn looks_like_png(bytes: &[u8]) -> bool {
    matches!(image::guess_format(bytes), Ok(ImageFormat::Png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_png_extension_declares_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        fs::File::create(&path).unwrap().write_all(&PNG_SIGNATURE).unwrap();

        let file = ImageFile::from_path(&path).unwrap();
        assert_eq!(file.name(), "a.png");
        assert!(file.is_png());
        assert_eq!(file.bytes(), &PNG_SIGNATURE);
    }

    #[test]
    fn test_other_extensions_are_not_png() {
        let dir = tempfile::tempdir().unwrap();
        let jpg = dir.path().join("photo.jpg");
        fs::write(&jpg, b"not really").unwrap();
        let txt = dir.path().join("notes.txt");
        fs::write(&txt, b"hello").unwrap();

        assert_eq!(ImageFile::from_path(&jpg).unwrap().media_type(), "image/jpeg");
        assert_eq!(ImageFile::from_path(&txt).unwrap().media_type(), OCTET_STREAM);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageFile::from_path(dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, UploadError::IoError(_)));
    }
}
