//! # Image payloads
//!
//! Image downloads come back as an [`ImageFetch`]: either the bytes with their
//! declared content type, or [`ImageFetch::NoImage`]. Fetching an image never
//! fails from the caller's point of view; a missing image, a network error and a
//! server error all look the same, and callers render a placeholder via
//! [`ImageFetch::url_or`].
//!
//! Uploads go through [`ImageUpload`], which can only be built from an
//! [`ImageKind`] in the png/jpeg/gif allow-list. Every upload path (registration
//! and later profile or petition image replacement) takes an `ImageUpload`, so
//! the same allow-list applies everywhere.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

/// Accepted image content types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported image type `{0}` (expected png, jpeg or gif)")]
pub struct ImageKindError(pub String);

impl ImageKind {
    pub fn mime(self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Gif => "image/gif",
        }
    }

    pub fn from_mime(mime: &str) -> Result<Self, ImageKindError> {
        // Ignore parameters such as `; charset=binary`
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/png" => Ok(ImageKind::Png),
            "image/jpeg" | "image/jpg" => Ok(ImageKind::Jpeg),
            "image/gif" => Ok(ImageKind::Gif),
            _ => Err(ImageKindError(mime.to_string())),
        }
    }

    /// Infer the kind from a file extension, as a file picker would.
    pub fn from_path(path: &Path) -> Result<Self, ImageKindError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "png" => Ok(ImageKind::Png),
            "jpg" | "jpeg" => Ok(ImageKind::Jpeg),
            "gif" => Ok(ImageKind::Gif),
            _ => Err(ImageKindError(path.display().to_string())),
        }
    }
}

/// Raw image bytes ready to be sent as a request body.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageUpload {
    pub kind: ImageKind,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(kind: ImageKind, bytes: Vec<u8>) -> Self {
        Self { kind, bytes }
    }

    /// Read an image from disk, rejecting files outside the allow-list.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let kind = ImageKind::from_path(path)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        Ok(Self {
            kind,
            bytes: std::fs::read(path)?,
        })
    }
}

/// A downloaded image with the content type the server declared.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBlob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageBlob {
    /// A self-contained `data:` URL usable wherever an image source is expected.
    pub fn object_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

/// Outcome of an image download.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageFetch {
    Found(ImageBlob),
    NoImage,
}

impl ImageFetch {
    pub fn is_found(&self) -> bool {
        matches!(self, ImageFetch::Found(_))
    }

    pub fn blob(&self) -> Option<&ImageBlob> {
        match self {
            ImageFetch::Found(blob) => Some(blob),
            ImageFetch::NoImage => None,
        }
    }

    /// The image URL, or `placeholder` when there is no image.
    pub fn url_or(&self, placeholder: &str) -> String {
        match self {
            ImageFetch::Found(blob) => blob.object_url(),
            ImageFetch::NoImage => placeholder.to_string(),
        }
    }
}
