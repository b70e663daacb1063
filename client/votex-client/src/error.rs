use reqwest::StatusCode;
use votex_interface::{ErrorBody, ErrorCode};

use crate::validation::ValidationError;

/// Failures of a [`crate::VotexClient`] call.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with an error body.
    #[error("HTTP {status}: {}", body.error)]
    Api { status: StatusCode, body: ErrorBody },
    /// The server answered with an error status but no error body, as a
    /// proxy in front of it would.
    #[error("HTTP {status}: {message}")]
    UnexpectedStatus { status: StatusCode, message: String },
    /// No response within the request timeout.
    #[error("request timed out")]
    Timeout,
    /// The server could not be reached.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    /// A successful response did not have the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),
    /// The API base URL is malformed.
    #[error("invalid API url: {0}")]
    InvalidUrl(String),
    /// Input was rejected before any request was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// HTTP status of the response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } | ClientError::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Machine-readable reason sent by the server.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api { body, .. } => Some(body.code),
            _ => None,
        }
    }

    /// Whether sending the same request again may succeed.
    ///
    /// Requests the server refused as malformed, unauthenticated or forbidden
    /// are final, as is anything rejected locally.
    pub fn is_retryable(&self) -> bool {
        match self.status() {
            Some(StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                false
            }
            Some(_) => true,
            None => !matches!(
                self,
                ClientError::InvalidUrl(_) | ClientError::Validation(_)
            ),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: StatusCode, code: ErrorCode) -> ClientError {
        ClientError::Api {
            status,
            body: ErrorBody::new(code, "boom"),
        }
    }

    #[test]
    fn client_faults_are_final() {
        assert!(!api_error(StatusCode::BAD_REQUEST, ErrorCode::MissingField).is_retryable());
        assert!(!api_error(StatusCode::FORBIDDEN, ErrorCode::AlreadyVoted).is_retryable());
        assert!(!ClientError::UnexpectedStatus {
            status: StatusCode::UNAUTHORIZED,
            message: String::new(),
        }
        .is_retryable());
        assert!(!ClientError::Validation(ValidationError::InvalidAddress).is_retryable());
    }

    #[test]
    fn server_and_transport_faults_are_retried() {
        assert!(api_error(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Internal).is_retryable());
        assert!(ClientError::UnexpectedStatus {
            status: StatusCode::BAD_GATEWAY,
            message: "upstream down".to_string(),
        }
        .is_retryable());
        assert!(ClientError::Timeout.is_retryable());
        assert!(ClientError::Decode("unexpected end of input".to_string()).is_retryable());
    }

    #[test]
    fn display_includes_server_message() {
        let err = api_error(StatusCode::FORBIDDEN, ErrorCode::AlreadyVoted);
        assert_eq!(err.to_string(), "HTTP 403 Forbidden: boom");
        assert_eq!(err.code(), Some(ErrorCode::AlreadyVoted));
    }
}
