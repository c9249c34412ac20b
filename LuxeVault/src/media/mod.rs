//! Media host uploads
//!
//! Binary assets (GLB models as `raw`, thumbnails as `image`) go to a media
//! host that answers with a public URL, a public identifier, and an
//! optional short-lived deletion token.

pub mod cloudinary;

use std::borrow::Cow;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Resource type the media host stores the upload as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Opaque binary (GLB models)
    Raw,
    /// Image (thumbnails)
    Image,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Raw => "raw",
            ResourceKind::Image => "image",
        }
    }
}

/// Where the bytes of an upload come from
#[derive(Debug, Clone, PartialEq, Eq)]
enum FileSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A file selected for upload. Path-backed files are read at upload time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    file_name: String,
    source: FileSource,
}

impl UploadFile {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            file_name,
            source: FileSource::Path(path.to_path_buf()),
        }
    }

    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            source: FileSource::Bytes(bytes),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Lowercased extension without the dot
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }

    /// File contents
    pub fn read(&self) -> Result<Cow<'_, [u8]>> {
        match &self.source {
            FileSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            FileSource::Path(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|e| Error::UnreadableFile {
                    path: path.clone(),
                    message: e.to_string(),
                }),
        }
    }

    /// Streaming reader over the contents, for header checks
    pub fn open(&self) -> Result<Box<dyn Read + '_>> {
        match &self.source {
            FileSource::Bytes(bytes) => Ok(Box::new(bytes.as_slice())),
            FileSource::Path(path) => std::fs::File::open(path)
                .map(|file| Box::new(file) as Box<dyn Read>)
                .map_err(|e| Error::UnreadableFile {
                    path: path.clone(),
                    message: e.to_string(),
                }),
        }
    }

    /// MIME type sent with the multipart part
    pub fn content_type(&self) -> &'static str {
        match self.extension().as_deref() {
            Some("glb") => "model/gltf-binary",
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            _ => "application/octet-stream",
        }
    }
}

/// What the media host returns for a stored upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub secure_url: String,
    pub public_id: String,
    pub delete_token: Option<String>,
}

/// A remote host for binary assets
pub trait MediaHost: Send + Sync {
    /// Store one file and return its retrieval URL and identifiers
    fn upload(&self, file: &UploadFile, kind: ResourceKind) -> Result<UploadedMedia>;

    /// Delete a recent upload using its deletion token
    fn delete_by_token(&self, token: &str) -> Result<()>;
}

/// Download a remote file into memory (viewer and download actions)
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let response = ureq::get(url).call()?;
    let mut bytes = Vec::new();
    std::io::Read::read_to_end(&mut response.into_reader(), &mut bytes)?;
    Ok(bytes)
}
