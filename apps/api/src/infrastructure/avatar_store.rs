use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// Extensions an uploaded avatar may keep; anything else is stored as `jpg`
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const DEFAULT_EXTENSION: &str = "jpg";

/// Errors raised while writing or reading avatar files
#[derive(Debug, Error)]
pub enum AvatarStoreError {
    #[error("failed to write avatar {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read avatar {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to prepare upload directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A file part received with a signup request
#[derive(Debug, Clone)]
pub struct AvatarFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Outcome of handling an optional avatar upload
///
/// Write failures are reported through `Err(AvatarStoreError)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarUpload {
    /// Stored under the contained generated filename
    Saved(String),
    /// The request carried no avatar, or an empty one
    NotProvided,
}

impl AvatarUpload {
    pub fn file_name(&self) -> Option<&str> {
        match self {
            AvatarUpload::Saved(name) => Some(name),
            AvatarUpload::NotProvided => None,
        }
    }
}

/// Stored avatar contents with the content type derived from its name
#[derive(Debug, Clone)]
pub struct StoredAvatar {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Avatar files kept in a single flat directory, named by random hex tokens
#[derive(Debug, Clone)]
pub struct AvatarStore {
    root: PathBuf,
}

impl AvatarStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the upload directory if needed
    pub async fn ensure_dir(&self) -> Result<(), AvatarStoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| AvatarStoreError::Directory {
                path: self.root.clone(),
                source,
            })
    }

    /// Persists an uploaded file under a freshly generated name
    pub async fn store(&self, upload: Option<AvatarFile>) -> Result<AvatarUpload, AvatarStoreError> {
        let Some(file) = upload.filter(|f| !f.bytes.is_empty()) else {
            return Ok(AvatarUpload::NotProvided);
        };

        let name = generate_file_name(file.file_name.as_deref());
        let path = self.root.join(&name);

        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|source| AvatarStoreError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(avatar = %name, bytes = file.bytes.len(), "Stored avatar");
        Ok(AvatarUpload::Saved(name))
    }

    /// Reads an avatar; `Ok(None)` when the name is not one this store could
    /// have produced or the file does not exist
    pub async fn load(&self, name: &str) -> Result<Option<StoredAvatar>, AvatarStoreError> {
        let Some(path) = self.path_for(name) else {
            return Ok(None);
        };

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(StoredAvatar {
                bytes,
                content_type: content_type_for(name),
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(AvatarStoreError::Read {
                path: path.clone(),
                source,
            }),
        }
    }

    /// Removes an avatar, logging instead of failing
    pub async fn remove(&self, name: &str) {
        let Some(path) = self.path_for(name) else {
            return;
        };

        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(avatar = %name, error = %e, "Failed to remove avatar");
            }
        }
    }

    fn path_for(&self, name: &str) -> Option<PathBuf> {
        is_valid_file_name(name).then(|| self.root.join(name))
    }
}

/// A stored name is ASCII alphanumerics, one dot, and an alphanumeric extension
pub fn is_valid_file_name(name: &str) -> bool {
    let Some((stem, extension)) = name.split_once('.') else {
        return false;
    };

    !stem.is_empty()
        && !extension.is_empty()
        && stem.chars().all(|c| c.is_ascii_alphanumeric())
        && extension.chars().all(|c| c.is_ascii_alphanumeric())
}

fn generate_file_name(original: Option<&str>) -> String {
    format!("{}.{}", Uuid::new_v4().simple(), extension_for(original))
}

fn extension_for(original: Option<&str>) -> &'static str {
    original
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .and_then(|ext| ALLOWED_EXTENSIONS.iter().copied().find(|allowed| *allowed == ext))
        .unwrap_or(DEFAULT_EXTENSION)
}

/// Content type served for an avatar, by extension
pub fn content_type_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
