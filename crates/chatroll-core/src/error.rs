//! Error types for Chatroll Core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while constructing core entities.
///
/// All of these are construction-time failures: the offending user or
/// message content is never created.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The raw string is not a valid phone number under the region.
    #[error("invalid phone number {raw:?}: {reason}")]
    InvalidPhone { raw: String, reason: String },

    /// The region code is not known to the phone metadata.
    #[error("unknown region code: {0}")]
    UnknownRegion(String),

    /// Missing or ambiguous content source.
    #[error("content source error: {0}")]
    ContentSource(String),

    /// Binary content could not be read from its path.
    #[error("failed to load content from {path}: {source}")]
    ContentLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
