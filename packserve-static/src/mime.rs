//! MIME type handling

use std::path::Path;

/// Get the MIME type for a file path, falling back to octet-stream
pub fn guess_mime_type(path: impl AsRef<Path>) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
}
