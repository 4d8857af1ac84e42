//! Client error types.

/// Errors that can occur when using the podcheck client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// Item not found.
    #[error("item not found: {message}")]
    ItemNotFound {
        /// The server's message.
        message: String,
    },

    /// The vote transaction kept conflicting; the caller may retry.
    #[error("vote conflict: {message}")]
    Conflict {
        /// The server's message.
        message: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
