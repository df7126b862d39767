//! Core types for the ESI edge delegation layer.
//!
//! This crate provides:
//! - `EsiError` - Error taxonomy shared across the workspace
//! - `EsiConfig` - Configuration surface (handler selection, permissions)
//! - `ResponseHeaders` - Ordered response-header collection
//! - `KeyMap` - Validated, insertion-ordered cache-key map
//! - `parse_ttl` - TTL strings with unit suffixes ("90", "1.5h", "1w")

mod config;
mod error;
mod headers;
mod key;
mod ttl;

pub use config::*;
pub use error::*;
pub use headers::*;
pub use key::*;
pub use ttl::*;
