use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::domain::ValidationError;
use crate::storage::RepositoryError;

/// Every way a request can fail, mapped to one status code each
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed input; nothing was touched in the store
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Body, path or query string could not be decoded
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(&'static str),
    /// Duplicate token, repeat enrollment, second check-in, dangling reference
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Storage(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) | ApiError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::InvalidDayOfWeek(_) => {
                ApiError::Validation(ValidationError::Invalid(err.to_string()))
            }
            RepositoryError::DuplicateNfcToken
            | RepositoryError::AlreadyEnrolled
            | RepositoryError::DuplicateCheckIn
            | RepositoryError::MissingReference => ApiError::Conflict(err.to_string()),
            RepositoryError::Database(e) => ApiError::Storage(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
