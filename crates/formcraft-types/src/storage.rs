//! Blob storage types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Path prefix for persisted form schemas.
pub const FORMS_PREFIX: &str = "forms/";

/// Path prefix for persisted submissions.
pub const SUBMISSIONS_PREFIX: &str = "submissions/";

/// Path prefix for files uploaded with submissions.
pub const UPLOADS_PREFIX: &str = "uploads/submissions/";

/// Path prefix for backup snapshots.
pub const BACKUPS_PREFIX: &str = "backups/";

/// Maximum accepted size for an uploaded file (10 MB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A stored blob as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobEntry {
    /// Store-relative path, e.g. `forms/0192.json`.
    pub path: String,
    /// Public URL the blob can be fetched from.
    pub url: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Replace characters that are unsafe in a blob path segment.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}
