//! Fragment inclusion for the ESI edge delegation layer.
//!
//! This crate provides:
//! - `FragmentTarget` - What to include: a template or a method call
//! - `PermissionGuard` - Allow-list gating for fragment targets
//! - `IncludeStrategy` - How to include it: edge markup, in-process
//!   evaluation, or discard
//! - `IncludeEngine` - Guard-then-strategy front door
//! - `es_include` / `es_cache` - Template-directive parameter handling
//! - `handle_include` - The edge-fetch endpoint dispatcher
//!
//! # Example
//!
//! ```
//! use esi_core::EsiConfig;
//! use esi_include::IncludeEngine;
//!
//! let config = EsiConfig::from_toml_str(
//!     r#"
//!     [permissions]
//!     allowed_templates = ["parts/menu.tpl"]
//!     "#,
//! )
//! .unwrap();
//! let engine = IncludeEngine::from_config(&config);
//! ```

mod directive;
mod endpoint;
mod engine;
mod host;
mod permission;
mod strategy;
mod target;

pub use directive::*;
pub use endpoint::*;
pub use engine::*;
pub use host::*;
pub use permission::*;
pub use strategy::*;
pub use target::*;
