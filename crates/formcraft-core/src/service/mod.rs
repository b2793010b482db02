//! Services over the blob store.
//!
//! Forms and submissions are stored as one JSON blob each under their own
//! prefix. Services are generic over [`BlobStore`] so formcraft-core never
//! depends on formcraft-infra.

pub mod backup;
pub mod forms;
pub mod submissions;

use serde::Serialize;
use serde::de::DeserializeOwned;

use formcraft_types::error::StorageError;
use formcraft_types::storage::BlobEntry;

use crate::storage::blob_store::BlobStore;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Serialize `value` and store it at `path`.
pub(crate) async fn put_json<S: BlobStore, T: Serialize>(
    store: &S,
    path: &str,
    value: &T,
) -> Result<BlobEntry, StorageError> {
    let bytes =
        serde_json::to_vec_pretty(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
    store.put(path, bytes, JSON_CONTENT_TYPE).await
}

/// Load every JSON blob under `prefix`.
///
/// Blobs that cannot be read or decoded are logged and skipped; only a
/// failure to list the prefix is an error.
pub(crate) async fn load_all<S: BlobStore, T: DeserializeOwned>(
    store: &S,
    prefix: &str,
) -> Result<Vec<T>, StorageError> {
    let entries = store.list(prefix).await?;
    let mut items = Vec::with_capacity(entries.len());

    for entry in entries.iter().filter(|e| e.path.ends_with(".json")) {
        let bytes = match store.get(&entry.url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %entry.path, error = %e, "failed to read blob, skipping");
                continue;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(item) => items.push(item),
            Err(e) => {
                tracing::warn!(path = %entry.path, error = %e, "failed to decode blob, skipping");
            }
        }
    }

    Ok(items)
}
