//! Local filesystem blob store.
//!
//! Blobs live at `{data_dir}/blobs/{path}` and are served by the API under
//! `{public_url}/blobs/{path}`.

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};

use formcraft_core::storage::blob_store::BlobStore;
use formcraft_types::error::StorageError;
use formcraft_types::storage::BlobEntry;

/// URL segment under which blobs are served.
pub const BLOBS_ROUTE: &str = "blobs";

pub struct LocalBlobStore {
    root: PathBuf,
    public_url: String,
}

impl LocalBlobStore {
    /// Store rooted at `{data_dir}/blobs`.
    pub fn new(data_dir: &Path, public_url: &str) -> Self {
        Self {
            root: data_dir.join(BLOBS_ROUTE),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{BLOBS_ROUTE}/{path}", self.public_url)
    }

    /// Store-relative path of a blob URL. Bare paths are accepted as-is.
    pub fn path_from_url<'a>(&self, url: &'a str) -> &'a str {
        let prefix = format!("{}/{BLOBS_ROUTE}/", self.public_url);
        url.strip_prefix(prefix.as_str()).unwrap_or(url)
    }

    /// Resolve a store-relative path to a file under the root.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        validate_path(path)?;
        Ok(self.root.join(path))
    }

    async fn entry_for(&self, path: String, file: &Path) -> Result<BlobEntry, StorageError> {
        let metadata = tokio::fs::metadata(file).await.map_err(io_error)?;
        let uploaded_at = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        Ok(BlobEntry {
            url: self.url_for(&path),
            path,
            size: metadata.len(),
            uploaded_at,
        })
    }
}

/// Reject empty, absolute and traversing paths.
pub fn validate_path(path: &str) -> Result<(), StorageError> {
    let invalid = || StorageError::InvalidPath(path.to_string());
    if path.is_empty() || path.contains('\\') || path.ends_with('/') {
        return Err(invalid());
    }
    let all_normal = Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !all_normal {
        return Err(invalid());
    }
    Ok(())
}

fn io_error(e: std::io::Error) -> StorageError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StorageError::NotFound(e.to_string())
    } else {
        StorageError::Io(e.to_string())
    }
}

impl BlobStore for LocalBlobStore {
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<BlobEntry, StorageError> {
        let file = self.resolve(path)?;
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        let size = bytes.len() as u64;
        tokio::fs::write(&file, bytes).await.map_err(io_error)?;

        tracing::debug!(path, size, content_type, "blob written");
        Ok(BlobEntry {
            path: path.to_string(),
            url: self.url_for(path),
            size,
            uploaded_at: Utc::now(),
        })
    }

    async fn list(&self, prefix: &str) -> Result<Vec<BlobEntry>, StorageError> {
        let mut entries = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut read_dir = match tokio::fs::read_dir(&dir).await {
                Ok(read_dir) => read_dir,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(StorageError::Io(e.to_string())),
            };

            while let Some(item) = read_dir.next_entry().await.map_err(io_error)? {
                let file = item.path();
                let file_type = item.file_type().await.map_err(io_error)?;
                if file_type.is_dir() {
                    pending.push(file);
                    continue;
                }

                let Ok(relative) = file.strip_prefix(&self.root) else {
                    continue;
                };
                let path = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                if path.starts_with(prefix) {
                    entries.push(self.entry_for(path, &file).await?);
                }
            }
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        let file = self.resolve(self.path_from_url(url))?;
        tokio::fs::read(&file).await.map_err(io_error)
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let file = self.resolve(path)?;
        match tokio::fs::remove_file(&file).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }
}
