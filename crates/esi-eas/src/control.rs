//! Cache-directive state behind the `Surrogate-Control` header.

use serde::{Deserialize, Serialize};

use crate::surrogate::ESI_1_0;

/// The cache directives of one response, as negotiated with surrogates.
///
/// A fresh value carries no directives at all; mutations accumulate until
/// the state is rendered. Rendering is deterministic: the same state always
/// produces the same directive string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurrogateControl {
    /// Whether the response should be ESI processed.
    pub use_esi: bool,
    /// Maximum age (TTL) of the response in seconds, if set.
    pub max_age: Option<u64>,
    /// Extra seconds a stale response may still be served while being
    /// revalidated. Only rendered when `max_age` is set.
    pub freshness_extension: u64,
    /// Forbid surrogates from storing the response.
    pub no_store: bool,
    /// Forbid remote surrogates from storing the response.
    pub no_store_remote: bool,
}

impl SurrogateControl {
    /// Create a state with no directives set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The ordered directive list for the current state.
    ///
    /// `no-store` always forces `max-age=0`, overriding any configured
    /// max age.
    pub fn directives(&self) -> Vec<String> {
        let mut directives = Vec::new();
        if self.no_store {
            directives.push("no-store".to_string());
            directives.push("max-age=0".to_string());
        } else if let Some(max_age) = self.max_age {
            if self.freshness_extension > 0 {
                directives.push(format!("max-age={}+{}", max_age, self.freshness_extension));
            } else {
                directives.push(format!("max-age={}", max_age));
            }
        }
        if self.no_store_remote {
            directives.push("no-store-remote".to_string());
        }
        if self.use_esi {
            directives.push(format!("content=\"{}\"", ESI_1_0));
        }
        directives
    }

    /// Render the directive list as a header value.
    pub fn render(&self) -> String {
        self.directives().join(", ")
    }
}
