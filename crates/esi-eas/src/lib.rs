//! Server side of the Edge Architecture Specification (EAS) 1.0.
//!
//! This crate provides:
//! - `Surrogate` - One surrogate and its capabilities, parsed from the
//!   `Surrogate-Capability` request header
//! - `SurrogateControl` - Cache-directive state rendered into the
//!   `Surrogate-Control` response header
//! - `EsiContext` - Request-scoped owner of both, with the scoped
//!   save/restore protocol that isolates nested in-process evaluation
//!
//! # Example
//!
//! ```
//! use esi_eas::EsiContext;
//!
//! let mut ctx = EsiContext::from_capability_header(Some(r#"abc="ESI/1.0 Surrogate/1.0""#));
//! ctx.set_max_age(300, 60);
//! assert_eq!(ctx.control_header(), Some("max-age=300+60"));
//! ```

mod context;
mod control;
mod surrogate;

pub use context::*;
pub use control::*;
pub use surrogate::*;
