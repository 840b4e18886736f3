//! File server implementation

use std::path::{Path, PathBuf};

use packserve_core::error::Result;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::mime;
use crate::precompressed::Encoding;

/// Configuration for the file server
#[derive(Debug, Clone)]
pub struct FileServerConfig {
    /// Root directory to serve
    pub root: PathBuf,
    /// Index files to look for
    pub index: Vec<String>,
    /// Enable directory browsing
    pub browse: bool,
    /// Serve pre-compressed sibling files (.br, .gz) when the client accepts them
    pub precompressed: bool,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index: vec!["index.html".to_string(), "index.htm".to_string()],
            browse: true,
            precompressed: true,
        }
    }
}

/// Static file server
pub struct FileServer {
    config: FileServerConfig,
}

/// Response from the file server
#[derive(Debug)]
pub struct ServedFile {
    pub content: Vec<u8>,
    pub mime_type: String,
    pub status: u16,
    pub content_range: Option<String>,
    pub last_modified: Option<String>,
    pub etag: Option<String>,
    pub content_encoding: Option<String>,
}

impl FileServer {
    /// Create a new file server
    pub fn new(config: FileServerConfig) -> Self {
        Self { config }
    }

    /// Create a file server for a directory
    pub fn serve_dir(root: impl Into<PathBuf>) -> Self {
        Self::new(FileServerConfig {
            root: root.into(),
            ..Default::default()
        })
    }

    /// Serve a file request
    ///
    /// Returns `Ok(None)` when the path does not resolve to anything
    /// servable, which the caller reports as 404.
    pub async fn serve(
        &self,
        path: &str,
        range_header: Option<&str>,
        accept_encoding: Option<&str>,
    ) -> Result<Option<ServedFile>> {
        // Reject anything that tries to climb out of the root
        if path.split('/').any(|segment| segment == "..") {
            return Ok(None);
        }

        let mut file_path = self.config.root.join(path.trim_start_matches('/'));

        tracing::debug!("📁 Serving request: {} -> {:?}", path, file_path);

        let metadata = match tokio::fs::metadata(&file_path).await {
            Ok(m) => m,
            Err(_) => return Ok(None),
        };

        if metadata.is_dir() {
            match self.resolve_index(&file_path).await {
                Some(index_path) => file_path = index_path,
                None if self.config.browse => {
                    let listing = self.render_listing(&file_path, path).await?;
                    return Ok(Some(ServedFile {
                        content: listing.into_bytes(),
                        mime_type: "text/html; charset=utf-8".to_string(),
                        status: 200,
                        content_range: None,
                        last_modified: None,
                        etag: None,
                        content_encoding: None,
                    }));
                }
                None => return Ok(None),
            }
        }

        let metadata = match tokio::fs::metadata(&file_path).await {
            Ok(m) => m,
            Err(_) => return Ok(None),
        };
        let file_size = metadata.len();

        let last_modified = metadata.modified().ok().map(httpdate::fmt_http_date);
        let etag = metadata.modified().ok().map(|modified| {
            let mtime = modified
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs();
            format!("\"{:x}-{:x}\"", file_size, mtime)
        });

        // Pre-compressed siblings only apply to complete responses
        if self.config.precompressed && range_header.is_none() {
            if let Some((content, encoding)) = self.sibling_variant(&file_path, accept_encoding).await {
                tracing::debug!(
                    "✅ Using pre-compressed variant: {} ({})",
                    file_path.display(),
                    encoding.header_value()
                );
                return Ok(Some(ServedFile {
                    content,
                    mime_type: mime::guess_mime_type(&file_path).to_string(),
                    status: 200,
                    content_range: None,
                    last_modified,
                    etag,
                    content_encoding: Some(encoding.header_value().to_string()),
                }));
            }
        }

        // Single bytes=start-end range; anything else gets the full body
        let mut status = 200;
        let mut content_range = None;
        let mut start = 0;
        let mut length = file_size;

        if let Some(range) = range_header {
            if let Some((range_start, range_end)) = parse_range(range, file_size) {
                start = range_start;
                length = range_end - range_start + 1;
                status = 206;
                content_range = Some(format!("bytes {}-{}/{}", range_start, range_end, file_size));
            }
        }

        let mut file = tokio::fs::File::open(&file_path).await?;
        if start > 0 {
            file.seek(std::io::SeekFrom::Start(start)).await?;
        }
        let mut content = vec![0u8; length as usize];
        file.read_exact(&mut content).await?;

        Ok(Some(ServedFile {
            content,
            mime_type: mime::guess_mime_type(&file_path).to_string(),
            status,
            content_range,
            last_modified,
            etag,
            content_encoding: None,
        }))
    }

    /// Try the configured index files in order
    async fn resolve_index(&self, dir: &Path) -> Option<PathBuf> {
        for index in &self.config.index {
            let candidate = dir.join(index);
            if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
                return Some(candidate);
            }
        }
        None
    }

    /// Look for a pre-compressed sibling of the resolved file, best encoding first
    async fn sibling_variant(
        &self,
        original: &Path,
        accept_encoding: Option<&str>,
    ) -> Option<(Vec<u8>, Encoding)> {
        let accept = accept_encoding?;

        for encoding in Encoding::ALL {
            if !encoding.accepted_by(accept) {
                continue;
            }

            let mut sibling = original.as_os_str().to_owned();
            sibling.push(encoding.extension());

            if let Ok(content) = tokio::fs::read(PathBuf::from(&sibling)).await {
                return Some((content, encoding));
            }
        }

        None
    }

    /// Generate an HTML directory listing
    async fn render_listing(&self, dir: &Path, req_path: &str) -> Result<String> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut html = format!(
            "<html><head><title>Index of {}</title></head><body><h1>Index of {}</h1><hr><pre>",
            req_path, req_path
        );

        // Parent link
        if req_path != "/" {
            html.push_str("<a href=\"..\">../</a>\n");
        }

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let display = if entry.file_type().await?.is_dir() {
                format!("{}/", name)
            } else {
                name.to_string()
            };

            html.push_str(&format!("<a href=\"{}\">{}</a>\n", display, display));
        }

        html.push_str("</pre><hr></body></html>");
        Ok(html)
    }
}

/// Parse a Range header (bytes=start-end, single range only)
fn parse_range(header: &str, file_size: u64) -> Option<(u64, u64)> {
    let value = header.strip_prefix("bytes=")?;
    let (start, end) = value.split_once('-')?;

    let last = file_size.checked_sub(1)?;
    let start = start.parse::<u64>().ok()?;
    let end = if end.is_empty() {
        last
    } else {
        end.parse::<u64>().ok()?.min(last)
    };

    if start > end || start >= file_size {
        return None;
    }

    Some((start, end))
}
