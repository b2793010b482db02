//! Blob storage implementations.

use std::path::Path;

pub mod filesystem;

/// Content type from a file extension, for serving stored blobs.
pub fn detect_mime(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "json" => "application/json",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "pdf" => "application/pdf",
        "doc" | "docx" => "application/msword",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_mime() {
        assert_eq!(detect_mime("backup-1.json"), "application/json");
        assert_eq!(detect_mime("0192-cv.PDF"), "application/pdf");
        assert_eq!(detect_mime("photo.jpeg"), "image/jpeg");
        assert_eq!(detect_mime("no_extension"), "application/octet-stream");
    }
}
