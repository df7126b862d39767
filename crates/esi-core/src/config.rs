//! Configuration surface for include handling and permissions.

use serde::{Deserialize, Serialize};

use crate::error::{EsiError, EsiResult};

/// Top-level configuration for the ESI layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EsiConfig {
    /// Include-handler settings.
    #[serde(default)]
    pub include: IncludeConfig,
    /// Allow-lists for fragment targets.
    #[serde(default)]
    pub permissions: PermissionsConfig,
}

impl EsiConfig {
    /// Parse a configuration from a TOML document.
    pub fn from_toml_str(content: &str) -> EsiResult<Self> {
        toml::from_str(content).map_err(|e| EsiError::Config(e.to_string()))
    }

    /// Serialize the configuration back to TOML.
    pub fn to_toml_string(&self) -> EsiResult<String> {
        toml::to_string_pretty(self).map_err(|e| EsiError::Config(e.to_string()))
    }
}

/// Settings for how fragment includes are resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncludeConfig {
    /// Which include handler to use: "edge", "inline" or "discard".
    /// An unknown name resolves to the discard handler.
    #[serde(default = "default_handler")]
    pub handler: String,
    /// URL prefix of the edge-fetch endpoint.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Send `X-Do-ESI: true` once something has been included.
    ///
    /// The header is not part of any standard, but a front-end cache can be
    /// configured to only run ESI processing when it is present.
    #[serde(default)]
    pub send_do_esi_header: bool,
    /// Add `onerror="continue"` to emitted include tags, so a failed fetch
    /// is deleted silently instead of surfacing an edge-processor error.
    #[serde(default)]
    pub continue_on_error: bool,
}

fn default_handler() -> String {
    "edge".to_string()
}

fn default_prefix() -> String {
    "/esi/include".to_string()
}

impl Default for IncludeConfig {
    fn default() -> Self {
        Self {
            handler: default_handler(),
            prefix: default_prefix(),
            send_do_esi_header: false,
            continue_on_error: false,
        }
    }
}

/// Allow-lists gating which fragment targets may be included.
///
/// Empty lists allow nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionsConfig {
    /// Template names that may be included.
    #[serde(default)]
    pub allowed_templates: Vec<String>,
    /// Method entries: either a bare class name (every method on it is
    /// allowed) or `Class::method` for one exact pair.
    #[serde(default)]
    pub allowed_methods: Vec<String>,
}
