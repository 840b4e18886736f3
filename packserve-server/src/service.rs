//! Static asset service implemented on Pingora's ProxyHttp trait
//!
//! There is no upstream: every request is answered in `request_filter` by the
//! file layer.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;
use packserve_static::{FileServer, ServedFile, precompressed};
use pingora_core::upstreams::peer::HttpPeer;
use pingora_http::ResponseHeader;
use pingora_proxy::{ProxyHttp, Session};

/// Context for each request
pub struct RequestCtx {
    /// Start time for logging
    pub start_time: Instant,
}

/// Static asset service
pub struct StaticService {
    files: Arc<FileServer>,
}

impl StaticService {
    /// Create a new service around a file server
    pub fn new(files: Arc<FileServer>) -> Self {
        Self { files }
    }

    /// Send a resolved file, decorating headers for pre-compressed assets
    async fn send_file(
        session: &mut Session,
        path: &str,
        file: ServedFile,
        head_only: bool,
    ) -> pingora_core::Result<()> {
        let mut header = ResponseHeader::build(file.status, Some(8))?;
        header.insert_header("Content-Type", file.mime_type.as_str())?;
        header.insert_header("Content-Length", file.content.len().to_string())?;
        header.insert_header("Accept-Ranges", "bytes")?;

        if let Some(range) = file.content_range {
            header.insert_header("Content-Range", range.as_str())?;
        }
        if let Some(last_modified) = file.last_modified {
            header.insert_header("Last-Modified", last_modified.as_str())?;
        }
        if let Some(etag) = file.etag {
            header.insert_header("ETag", etag.as_str())?;
        }
        if let Some(encoding) = file.content_encoding {
            header.insert_header("Content-Encoding", encoding.as_str())?;
        }

        // Requests that name a pre-compressed artifact by suffix override the
        // defaults, last thing before the headers are written out
        for (name, value) in precompressed::headers_for(path) {
            header.insert_header(name, value)?;
        }

        session.write_response_header(Box::new(header), head_only).await?;
        if !head_only {
            session
                .write_response_body(Some(Bytes::from(file.content)), true)
                .await?;
        }
        Ok(())
    }

    /// Send a plain-text status response
    async fn respond_plain(
        session: &mut Session,
        status: u16,
        body: &str,
    ) -> pingora_core::Result<()> {
        let mut header = ResponseHeader::build(status, Some(2))?;
        header.insert_header("Content-Type", "text/plain; charset=utf-8")?;
        header.insert_header("Content-Length", body.len().to_string())?;
        session.write_response_header(Box::new(header), false).await?;
        session
            .write_response_body(Some(Bytes::copy_from_slice(body.as_bytes())), true)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ProxyHttp for StaticService {
    type CTX = RequestCtx;

    fn new_ctx(&self) -> Self::CTX {
        RequestCtx {
            start_time: Instant::now(),
        }
    }

    /// Request filter (answers every request, no upstream exists)
    async fn request_filter(
        &self,
        session: &mut Session,
        ctx: &mut Self::CTX,
    ) -> pingora_core::Result<bool> {
        // Collect what we need in a scope to release the borrow of session
        let (path, head_only, range_header, accept_encoding) = {
            let req_header = session.req_header();
            let path = req_header.uri.path().to_string();
            let head_only = req_header.method.as_str() == "HEAD";
            let range_header = req_header
                .headers
                .get("Range")
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let accept_encoding = req_header
                .headers
                .get("Accept-Encoding")
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            (path, head_only, range_header, accept_encoding)
        };

        match self
            .files
            .serve(&path, range_header.as_deref(), accept_encoding.as_deref())
            .await
        {
            Ok(Some(file)) => {
                let status = file.status;
                Self::send_file(session, &path, file, head_only).await?;
                tracing::debug!(
                    path = %path,
                    status,
                    elapsed_ms = ctx.start_time.elapsed().as_millis(),
                    "✅ Request completed"
                );
            }
            Ok(None) => {
                Self::respond_plain(session, 404, "404 Not Found").await?;
                tracing::debug!(path = %path, "Not found");
            }
            Err(e) => {
                tracing::error!(path = %path, error = %e, "❌ Failed to serve file");
                Self::respond_plain(session, 500, "500 Internal Server Error").await?;
            }
        }

        Ok(true)
    }

    /// Never reached: request_filter answers everything
    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> pingora_core::Result<Box<HttpPeer>>
    where
        Self::CTX: Send + Sync,
    {
        Err(pingora_core::Error::new(pingora_core::ErrorType::ConnectNoRoute))
    }
}
