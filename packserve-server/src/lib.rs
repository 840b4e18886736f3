//! Packserve HTTP Service
//!
//! 🌐 This crate implements the Pingora service that answers every request
//! from the static file layer and decorates responses for pre-compressed
//! assets before the headers go out.

mod service;

pub use service::{RequestCtx, StaticService};
