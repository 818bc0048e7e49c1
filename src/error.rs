//! Error types for k2list.

use thiserror::Error;

/// Error type for k2list operations.
///
/// Lines that fail to normalize are not errors; they are dropped. Only
/// stream failures and configuration problems surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error while reading input or writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Field separator cannot be used to split lines
    #[error("invalid field separator {separator:?}: {reason}")]
    InvalidSeparator { separator: String, reason: String },

    /// Unknown processing mode
    #[error("invalid mode: {0} (expected domain, ip or mixed)")]
    InvalidMode(String),

    /// Unknown grammar variant
    #[error("invalid grammar: {0} (expected full or ipv4-only)")]
    InvalidGrammar(String),

    /// Unknown header policy
    #[error("invalid header policy: {0} (expected domain or both)")]
    InvalidHeaderPolicy(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for k2list operations.
pub type Result<T> = std::result::Result<T, Error>;
