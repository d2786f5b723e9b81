//! Error types for the discount catalog

/// Errors fetching a discount catalog page
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Request never produced a response
    #[error("catalog transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("catalog returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if readable
        message: String,
    },

    /// GraphQL-level errors in a 2xx response
    #[error("catalog query failed: {0}")]
    Query(String),

    /// Response body did not match the expected shape
    #[error("catalog response malformed: {0}")]
    Decode(String),
}

impl CatalogError {
    /// Whether retrying the same request may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Query(_) | Self::Decode(_) => false,
        }
    }
}
