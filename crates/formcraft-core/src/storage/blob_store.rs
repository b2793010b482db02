//! Blob store trait.
//!
//! Forms, submissions, uploads and backups are all independent blobs
//! addressed by a store-relative path (`forms/{id}.json`, ...). Each stored
//! blob also has a public URL, which is what submissions reference for
//! uploaded files.

use formcraft_types::error::StorageError;
use formcraft_types::storage::BlobEntry;

/// Key-value blob storage.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait BlobStore: Send + Sync {
    /// Store `bytes` at `path`, replacing any existing blob.
    fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl std::future::Future<Output = Result<BlobEntry, StorageError>> + Send;

    /// List every blob whose path starts with `prefix`.
    fn list(
        &self,
        prefix: &str,
    ) -> impl std::future::Future<Output = Result<Vec<BlobEntry>, StorageError>> + Send;

    /// Fetch a blob's content by URL (or store-relative path).
    fn get(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, StorageError>> + Send;

    /// Remove a blob. Removing a missing blob is not an error.
    fn delete(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;
}
