//! Serves stored blobs (uploads, backups) at their public URLs.

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::IntoResponse;

use formcraft_core::storage::blob_store::BlobStore;
use formcraft_infra::blob::detect_mime;
use formcraft_types::storage::UPLOADS_PREFIX;

use crate::http::error::AppError;
use crate::state::AppState;

/// Types a browser would render or script on our origin.
const ACTIVE_CONTENT: &[&str] = &["text/html", "image/svg+xml"];

/// GET /blobs/{*path}
pub async fn get_blob(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = state.store.get(&path).await?;
    Ok((blob_headers(&path), bytes))
}

/// Response headers for a stored blob.
///
/// Visitor uploads are always served as downloads, and never with an
/// active content type.
fn blob_headers(path: &str) -> HeaderMap {
    let mut mime = detect_mime(path);
    let mut headers = HeaderMap::new();
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    if path.starts_with(UPLOADS_PREFIX) {
        if ACTIVE_CONTENT.contains(&mime) {
            mime = "application/octet-stream";
        }
        headers.insert(CONTENT_DISPOSITION, HeaderValue::from_static("attachment"));
    }

    headers.insert(CONTENT_TYPE, HeaderValue::from_static(mime));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_html_is_downgraded() {
        let headers = blob_headers("uploads/submissions/0192-evil.html");
        assert_eq!(headers[CONTENT_TYPE], "application/octet-stream");
        assert_eq!(headers[CONTENT_DISPOSITION], "attachment");
        assert_eq!(headers[X_CONTENT_TYPE_OPTIONS], "nosniff");

        let headers = blob_headers("uploads/submissions/0192-logo.SVG");
        assert_eq!(headers[CONTENT_TYPE], "application/octet-stream");
    }

    #[test]
    fn test_upload_pdf_keeps_type_as_attachment() {
        let headers = blob_headers("uploads/submissions/0192-cv.pdf");
        assert_eq!(headers[CONTENT_TYPE], "application/pdf");
        assert_eq!(headers[CONTENT_DISPOSITION], "attachment");
    }

    #[test]
    fn test_backup_served_inline() {
        let headers = blob_headers("backups/backup-1.json");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert!(headers.get(CONTENT_DISPOSITION).is_none());
    }
}
