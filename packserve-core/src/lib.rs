//! Packserve Core Library
//!
//! This crate provides the core functionality for the Packserve asset server:
//! configuration management and error handling.

pub mod config;
pub mod error;

pub use config::ServeConfig;
pub use error::{Error, Result};

/// Packserve version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
