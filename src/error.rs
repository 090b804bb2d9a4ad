//! Error types for the blocklog library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration-time error type.
///
/// Nothing on the logging path itself returns this: once setup has succeeded,
/// log calls are fire-and-forget and degrade internally instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred (log file creation, flush)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Unrecognized severity level name or numeric value
    #[error("invalid level: {0:?}")]
    InvalidLevel(String),

    /// No namespace supplied, neither explicitly nor via the environment
    #[error("no namespace resolvable at setup (pass one explicitly or set BLOCKLOG_NAMESPACE)")]
    MissingNamespace,

    /// Line-format template that cannot be scanned
    #[error("invalid line format: {0}")]
    InvalidFormat(String),
}
