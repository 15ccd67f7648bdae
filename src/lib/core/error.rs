use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::ErrorBody;

#[cfg(feature = "tracing")]
use tracing::error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Todo with id {0} not found")]
    NotFound(i64),
    #[cfg(feature = "storage")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Id is not a number")]
    InvalidId,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    UnsupportedMediaType(String),
    #[error("Todo with id {0} not found")]
    NotFound(i64),
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::NotFound(id),
            other => ApiError::Store(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            ApiError::InvalidId => (StatusCode::BAD_REQUEST, None, self.to_string()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, Some("Bad Request"), msg.clone()),
            ApiError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Some("Unsupported Media Type"),
                msg.clone(),
            ),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, Some("Not Found"), self.to_string()),
            ApiError::Store(_) => {
                #[cfg(feature = "tracing")]
                error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Some("Internal Server Error"),
                    "An internal server error occurred".to_string(),
                )
            }
        };
        let body = ErrorBody {
            status_code: status.as_u16(),
            error,
            message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_becomes_404() {
        let err = ApiError::from(StoreError::NotFound(7));
        assert!(matches!(err, ApiError::NotFound(7)));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_id_is_bad_request() {
        assert_eq!(ApiError::InvalidId.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
