//! Header policy for pre-compressed assets
//!
//! Web build pipelines (Unity WebGL, wasm bundlers) emit Brotli and Gzip
//! variants next to the original artifact. A response for such a variant must
//! carry the compression transform in `Content-Encoding` and the type of the
//! *decompressed* payload in `Content-Type`, otherwise browsers refuse to
//! execute the script or compile the wasm module.

/// Compression encodings recognized by file suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Brotli,
    Gzip,
}

impl Encoding {
    /// Lookup order for pre-compressed siblings, smallest payload first
    pub const ALL: [Encoding; 2] = [Encoding::Brotli, Encoding::Gzip];

    /// Get the content-encoding header value
    pub fn header_value(self) -> &'static str {
        match self {
            Encoding::Brotli => "br",
            Encoding::Gzip => "gzip",
        }
    }

    /// File extension carried by pre-compressed variants
    pub fn extension(self) -> &'static str {
        match self {
            Encoding::Brotli => ".br",
            Encoding::Gzip => ".gz",
        }
    }

    /// Whether an Accept-Encoding header value allows this encoding
    pub fn accepted_by(self, accept_encoding: &str) -> bool {
        accept_encoding.contains(self.header_value())
    }
}

/// Content-Type overrides keyed by the suffix that remains once the
/// compression extension is stripped. First match wins.
const CONTENT_TYPES: &[(&str, &str)] = &[
    (".js", "application/javascript"),
    (".wasm", "application/wasm"),
    (".data", "application/octet-stream"),
    (".json", "application/json"),
];

/// Split a request path into its compression encoding and the remaining stem
pub fn split_encoding(path: &str) -> Option<(Encoding, &str)> {
    for encoding in Encoding::ALL {
        if let Some(stem) = path.strip_suffix(encoding.extension()) {
            return Some((encoding, stem));
        }
    }
    None
}

/// Extra response headers for a request path.
///
/// Paths ending in `.br` or `.gz` get the matching `Content-Encoding`, and
/// the four well-known double suffixes (`.js`, `.wasm`, `.data`, `.json`
/// before the compression extension) additionally force the `Content-Type`
/// of the decompressed payload. Any other path gets no extra headers and the
/// server's default type inference applies. Matching is case-sensitive and
/// purely suffix-based; the path is never touched beyond string comparison.
pub fn headers_for(path: &str) -> Vec<(&'static str, &'static str)> {
    let Some((encoding, stem)) = split_encoding(path) else {
        return Vec::new();
    };

    let mut headers = vec![("Content-Encoding", encoding.header_value())];
    for &(suffix, mime) in CONTENT_TYPES {
        if stem.ends_with(suffix) {
            headers.push(("Content-Type", mime));
            break;
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_type(path: &str) -> Option<&'static str> {
        headers_for(path)
            .into_iter()
            .find(|(name, _)| *name == "Content-Type")
            .map(|(_, value)| value)
    }

    fn content_encoding(path: &str) -> Option<&'static str> {
        headers_for(path)
            .into_iter()
            .find(|(name, _)| *name == "Content-Encoding")
            .map(|(_, value)| value)
    }

    #[test]
    fn test_brotli_suffixes() {
        assert_eq!(content_encoding("/app.js.br"), Some("br"));
        assert_eq!(content_type("/app.js.br"), Some("application/javascript"));
        assert_eq!(content_type("/module.wasm.br"), Some("application/wasm"));
        assert_eq!(content_type("/payload.data.br"), Some("application/octet-stream"));
        assert_eq!(content_type("/state.json.br"), Some("application/json"));
    }

    #[test]
    fn test_gzip_suffixes() {
        assert_eq!(content_encoding("/app.js.gz"), Some("gzip"));
        assert_eq!(content_type("/app.js.gz"), Some("application/javascript"));
        assert_eq!(content_type("/module.wasm.gz"), Some("application/wasm"));
        assert_eq!(content_type("/payload.data.gz"), Some("application/octet-stream"));
        assert_eq!(content_type("/state.json.gz"), Some("application/json"));
    }

    #[test]
    fn test_bare_compression_suffix_keeps_default_type() {
        // Encoding is always emitted, the type override only for known stems
        assert_eq!(headers_for("/style.css.br"), vec![("Content-Encoding", "br")]);
        assert_eq!(headers_for("/archive.gz"), vec![("Content-Encoding", "gzip")]);
        // "data.br" is a bare brotli file, not a "*.data.br" artifact
        assert_eq!(headers_for("/data.br"), vec![("Content-Encoding", "br")]);
        assert_eq!(headers_for("/json.gz"), vec![("Content-Encoding", "gzip")]);
    }

    #[test]
    fn test_unmatched_paths_get_nothing() {
        assert!(headers_for("/index.html").is_empty());
        assert!(headers_for("/data.bin").is_empty());
        assert!(headers_for("/app.js").is_empty());
        assert!(headers_for("/").is_empty());
        assert!(headers_for("").is_empty());
        // The extension must terminate the path
        assert!(headers_for("/app.js.br.map").is_empty());
        assert!(headers_for("/app.gzip").is_empty());
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(headers_for("/APP.JS.BR").is_empty());
        assert!(headers_for("/app.js.GZ").is_empty());
        assert_eq!(headers_for("/APP.JS.br"), vec![("Content-Encoding", "br")]);
    }

    #[test]
    fn test_encoding_header_precedes_type_override() {
        let headers = headers_for("/module.wasm.gz");
        assert_eq!(
            headers,
            vec![
                ("Content-Encoding", "gzip"),
                ("Content-Type", "application/wasm"),
            ]
        );
    }

    #[test]
    fn test_split_encoding() {
        assert_eq!(split_encoding("/a.js.br"), Some((Encoding::Brotli, "/a.js")));
        assert_eq!(split_encoding("/a.js.gz"), Some((Encoding::Gzip, "/a.js")));
        assert_eq!(split_encoding("/a.js"), None);
        assert_eq!(split_encoding(".br"), Some((Encoding::Brotli, "")));
    }

    #[test]
    fn test_accepted_by() {
        assert!(Encoding::Brotli.accepted_by("gzip, deflate, br"));
        assert!(!Encoding::Brotli.accepted_by("gzip, deflate"));
        assert!(Encoding::Gzip.accepted_by("gzip"));
        assert!(!Encoding::Gzip.accepted_by("br"));
    }
}
