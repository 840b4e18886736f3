//! Packserve Static File Serving Module
//!
//! Static file serving for pre-compressed web assets:
//! - Content-Encoding / Content-Type decoration for `.br` and `.gz` artifacts
//! - MIME type detection
//! - Pre-compressed sibling lookup
//! - Directory browsing and index file handling

mod file_server;
pub mod mime;
pub mod precompressed;

pub use file_server::{FileServer, FileServerConfig, ServedFile};
pub use precompressed::Encoding;
