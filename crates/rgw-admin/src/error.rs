//! Admin API error types

use thiserror::Error;

/// Result type for admin API calls
pub type Result<T> = std::result::Result<T, AdminError>;

/// Errors returned by the admin API client
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("could not send request: {0}")]
    Transport(String),

    #[error("request canceled")]
    Canceled,

    #[error("request deadline exceeded")]
    DeadlineExceeded,

    #[error("unexpected response code {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("could not parse json: {0}")]
    MalformedResponse(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid admin client configuration: {0}")]
    InvalidConfig(String),
}

impl AdminError {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an invalid response error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Check if the call failed before a response was received
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Canceled | Self::DeadlineExceeded
        )
    }

    /// HTTP status code of a non-success response, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AdminError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::DeadlineExceeded
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_message_keeps_body() {
        let err = AdminError::UnexpectedStatus {
            status: 404,
            body: r#"{"Code":"NoSuchUser"}"#.to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"unexpected response code 404: {"Code":"NoSuchUser"}"#
        );
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_transport_classification() {
        assert!(AdminError::Canceled.is_transport());
        assert!(AdminError::DeadlineExceeded.is_transport());
        assert!(AdminError::transport("connection refused").is_transport());
        assert!(!AdminError::invalid_response("empty").is_transport());
        assert_eq!(AdminError::Canceled.status(), None);
    }
}
