//! Error types for Notion API operations.

use std::time::Duration;

/// Error from a Notion API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotionError {
    /// Connection, TLS or timeout failure before a response arrived.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status.
    #[error("HTTP error: {status} - {body}")]
    Http { status: u16, body: String },

    /// HTTP 429. `retry_after` comes from the `Retry-After` header.
    #[error("Rate limited by Notion API")]
    RateLimited { retry_after: Option<Duration> },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Response body is missing an expected field.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl NotionError {
    /// Whether the same call may succeed when repeated.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::RateLimited { .. } => true,
            Self::Http { status, .. } => matches!(status, 502..=504),
            Self::Json(_) | Self::UnexpectedResponse(_) => false,
        }
    }

    /// Server-requested wait before retrying.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for NotionError {
    fn from(e: serde_json::Error) -> Self {
        NotionError::Json(e.to_string())
    }
}

impl From<ureq::Error> for NotionError {
    fn from(e: ureq::Error) -> Self {
        NotionError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(NotionError::Transport("timeout".to_owned()).is_retryable());
        assert!(NotionError::RateLimited { retry_after: None }.is_retryable());
        for status in [502, 503, 504] {
            let err = NotionError::Http {
                status,
                body: String::new(),
            };
            assert!(err.is_retryable(), "{status} should be retried");
        }
    }

    #[test]
    fn test_permanent_errors() {
        for status in [400, 401, 403, 404, 409, 500] {
            let err = NotionError::Http {
                status,
                body: String::new(),
            };
            assert!(!err.is_retryable(), "{status} should not be retried");
        }
        assert!(!NotionError::Json("bad".to_owned()).is_retryable());
    }

    #[test]
    fn test_retry_after() {
        let err = NotionError::RateLimited {
            retry_after: Some(Duration::from_secs(2)),
        };
        assert_eq!(err.retry_after(), Some(Duration::from_secs(2)));
        assert_eq!(NotionError::Transport(String::new()).retry_after(), None);
    }
}
