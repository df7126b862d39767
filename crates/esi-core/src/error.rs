//! Error types shared across the ESI workspace.

/// Result type for ESI operations.
pub type EsiResult<T> = Result<T, EsiError>;

/// Errors from parsing and configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EsiError {
    /// TTL string does not match the accepted grammar.
    #[error("invalid TTL value: {0:?}")]
    InvalidTtl(String),

    /// Key name contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid key name: {0:?}")]
    InvalidKeyName(String),

    /// Key value is not a string, number, or boolean.
    #[error("unsupported value for key {0:?}")]
    InvalidKeyValue(String),

    /// Method spec is not `Class::method` or `Class->method`.
    #[error("invalid method spec: {0}")]
    InvalidMethodSpec(String),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}
