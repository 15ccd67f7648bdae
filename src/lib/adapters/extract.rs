use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::core::{ApiError, NewTodo, TodoPayload};

/// A create/update body that already passed the payload schema. Rejections
/// happen before the handler body runs, so nothing reaches the store.
#[derive(Debug)]
pub struct TodoInput(pub NewTodo);

impl<S> FromRequest<S> for TodoInput
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<TodoPayload>::from_request(req, state)
            .await
            .map_err(reject)?;
        payload
            .into_new_todo()
            .map(TodoInput)
            .map_err(ApiError::Validation)
    }
}

fn reject(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::MissingJsonContentType(e) => ApiError::UnsupportedMediaType(e.body_text()),
        JsonRejection::JsonSyntaxError(_) => {
            ApiError::Validation("Invalid request payload JSON format".to_string())
        }
        other => ApiError::Validation(other.body_text()),
    }
}
