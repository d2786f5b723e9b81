//! Error types for QR code API calls

use async_trait::async_trait;
use reqwest::Response;

/// Errors from the QR code API
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Request never produced a response (connect, timeout, TLS)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("request failed with {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if readable
        message: String,
    },

    /// 2xx response whose body is not a QR code
    #[error("malformed response: {0}")]
    Decode(String),

    /// Base URL cannot carry path segments
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// Whether retrying the same request may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Decode(_) | Self::InvalidBaseUrl(_) => false,
        }
    }

    /// HTTP status, when the server answered
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            Self::Decode(_) | Self::InvalidBaseUrl(_) => None,
        }
    }
}

/// Maps non-success responses into [`ClientError::Status`]
#[async_trait]
pub(crate) trait ResponseExt: Sized {
    async fn map_client_error(self) -> Result<Response, ClientError>;
}

#[async_trait]
impl ResponseExt for Response {
    async fn map_client_error(self) -> Result<Response, ClientError> {
        let status = self.status();
        if status.is_success() {
            return Ok(self);
        }
        Err(ClientError::Status {
            status: status.as_u16(),
            message: self.text().await.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let err = ClientError::Status {
            status: 422,
            message: "title missing".to_string(),
        };
        assert_eq!(err.to_string(), "request failed with 422: title missing");
        assert_eq!(err.status(), Some(422));
        assert!(!err.is_retryable());
    }

    #[test]
    fn server_errors_are_retryable() {
        let err = ClientError::Status {
            status: 502,
            message: String::new(),
        };
        assert!(err.is_retryable());
        assert!(!ClientError::Decode("eof".to_string()).is_retryable());
    }
}
