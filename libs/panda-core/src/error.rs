//! Error types for panda-core.

use thiserror::Error;

/// Result type alias using ExtractError.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while preparing card extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid tag pattern for '{word}': {source}")]
    InvalidTagPattern {
        word: String,
        #[source]
        source: regex::Error,
    },
}
