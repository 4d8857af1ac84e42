//! Error types for podcheck storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record that was missing.
        entity: &'static str,
        /// The ID that was looked up.
        id: String,
    },

    /// Optimistic transaction kept conflicting after the retry budget.
    #[error("transaction conflict in {op}")]
    Conflict {
        /// The operation that conflicted.
        op: &'static str,
    },
}

impl StoreError {
    /// Convenience constructor for `NotFound`.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
