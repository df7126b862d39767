//! Parsing of the `Surrogate-Capability` request header.

use serde::{Deserialize, Serialize};

/// Capability token for ESI 1.0 processing.
pub const ESI_1_0: &str = "ESI/1.0";

/// Capability token for a surrogate that understands EAS negotiation.
pub const SURROGATE_1_0: &str = "Surrogate/1.0";

/// One surrogate identified from the capability header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surrogate {
    /// The device token the surrogate identified itself with.
    pub device_token: String,
    /// The capability tokens it advertised.
    pub capabilities: Vec<String>,
}

impl Surrogate {
    /// Whether this surrogate advertised the given capability.
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}

/// Parse a `Surrogate-Capability` header value.
///
/// The header is a comma-separated list of `token="cap1 cap2 ..."` entries.
/// Parsing is lenient: entries that do not follow the grammar are skipped,
/// and an empty header yields an empty list. Commas inside the quoted
/// capability list do not split entries.
pub fn parse_capability_header(header: &str) -> Vec<Surrogate> {
    split_entries(header)
        .into_iter()
        .filter_map(|entry| parse_entry(entry.trim()))
        .collect()
}

/// Split the header at commas that are outside quoted strings.
fn split_entries(header: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (index, c) in header.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                entries.push(&header[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    entries.push(&header[start..]);
    entries
}

fn parse_entry(entry: &str) -> Option<Surrogate> {
    let (token, value) = entry.split_once('=')?;
    if token.is_empty() || !token.chars().all(is_token_char) {
        return None;
    }
    let capabilities = value.strip_prefix('"')?.strip_suffix('"')?;
    if capabilities.contains('"') {
        return None;
    }
    Some(Surrogate {
        device_token: token.to_string(),
        capabilities: capabilities
            .split(' ')
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect(),
    })
}

/// HTTP token charset: no control characters, whitespace, or separators.
fn is_token_char(c: char) -> bool {
    !c.is_ascii_control()
        && !matches!(
            c,
            '(' | ')'
                | '<'
                | '>'
                | '@'
                | ','
                | ';'
                | ':'
                | '\\'
                | '"'
                | '/'
                | '['
                | ']'
                | '?'
                | '='
                | '{'
                | '}'
                | ' '
                | '\t'
        )
}
