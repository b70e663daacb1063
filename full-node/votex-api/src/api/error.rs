use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, warn};
use votex_gateway::GatewayError;
use votex_interface::{ErrorBody, ErrorCode};

/// Everything a handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required field was absent or blank.
    #[error("{0}")]
    MissingField(&'static str),
    /// The request could not be parsed.
    #[error("{0}")]
    InvalidInput(String),
    /// An address could not be parsed.
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),
    /// The voter may not perform the operation right now.
    #[error("{1}")]
    Forbidden(ErrorCode, &'static str),
    /// The contract refused to restart the election.
    #[error("{0}")]
    RestartRejected(String),
    /// The gateway call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) | ApiError::InvalidInput(_) | ApiError::InvalidAddress(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Forbidden(..) | ApiError::RestartRejected(_) => StatusCode::FORBIDDEN,
            ApiError::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::MissingField(_) => ErrorCode::MissingField,
            ApiError::InvalidInput(_) => ErrorCode::InvalidInput,
            ApiError::InvalidAddress(_) => ErrorCode::InvalidAddress,
            ApiError::Forbidden(code, _) => *code,
            ApiError::RestartRejected(_) => ErrorCode::RestartRejected,
            ApiError::Gateway(err) => match err.revert_reason() {
                Some(reason) => ErrorCode::from_revert_reason(reason),
                None => ErrorCode::Internal,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        if status.is_server_error() {
            warn!(%code, error = %self, "Request failed");
        } else {
            debug!(%code, error = %self, "Request rejected");
        }
        (status, Json(ErrorBody::new(code, self.to_string()))).into_response()
    }
}
