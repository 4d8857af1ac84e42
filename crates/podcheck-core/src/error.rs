//! Error types for podcheck core.

use crate::ids::IdError;
use crate::vote::InvalidVoteValue;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    /// Vote value outside {-1, 0, +1}.
    #[error(transparent)]
    InvalidVoteValue(#[from] InvalidVoteValue),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
