//! Configuration type definitions
//!
//! These types represent the runtime configuration for Packserve.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Root configuration for Packserve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeConfig {
    /// Listen address, e.g. "0.0.0.0:8080" or the shorthand ":8080"
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Root directory to serve
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Index files to look for when a directory is requested
    #[serde(default = "default_index")]
    pub index: Vec<String>,

    /// Enable directory browsing
    #[serde(default = "default_bool_true")]
    pub browse: bool,

    /// Serve pre-compressed sibling files (.br, .gz) when the client accepts them
    #[serde(default = "default_bool_true")]
    pub precompressed: bool,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_index() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

fn default_bool_true() -> bool {
    true
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            root: default_root(),
            index: default_index(),
            browse: true,
            precompressed: true,
        }
    }
}

impl ServeConfig {
    /// Load configuration from a TOML or JSON file, selected by extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?,
            _ => toml::from_str(&content)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?,
        };

        tracing::debug!("📄 Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Listen address with the ":port" shorthand expanded
    pub fn listen_addr(&self) -> String {
        if self.listen.starts_with(':') {
            format!("0.0.0.0{}", self.listen)
        } else {
            self.listen.clone()
        }
    }
}
