use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};

use crate::core::{ApiError, Envelope, Todo};
use crate::storage::TodoStore;

use super::extract::TodoInput;

#[cfg(feature = "tracing")]
use tracing::{info, instrument};

/// Handlers receive the store explicitly through axum state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/{id}", get(get_todo))
        .route("/id/{id}", put(update_todo).delete(delete_todo))
}

/// Parses a path id the way `parseInt` does without a radix: leading
/// whitespace, an optional sign, an optional `0x`/`0X` switching to base 16,
/// then the longest run of digits. Trailing junk is ignored.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (radix, rest) = match rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        Some(hex) => (16, hex),
        None => (10, rest),
    };
    let len = rest
        .chars()
        .take_while(|c| c.is_digit(radix))
        .count();
    if len == 0 {
        return Err(ApiError::InvalidId);
    }
    let id = i64::from_str_radix(&rest[..len], radix).map_err(|_| ApiError::InvalidId)?;
    Ok(if negative { -id } else { id })
}

#[cfg_attr(feature = "tracing", instrument(skip(state)))]
pub async fn list_todos(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Todo>>>, ApiError> {
    #[cfg(feature = "tracing")]
    info!("Reading all todos");
    let todos = state.store.list_all().await?;
    Ok(Json(Envelope::list(todos)))
}

#[cfg_attr(feature = "tracing", instrument(skip(state)))]
pub async fn get_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let id = parse_id(&raw_id)?;
    let todo = state.store.get_by_id(id).await?;
    Ok(Json(Envelope::single(200, "success", todo)))
}

#[cfg_attr(feature = "tracing", instrument(skip(state, fields)))]
pub async fn create_todo(
    State(state): State<AppState>,
    TodoInput(fields): TodoInput,
) -> Result<(StatusCode, Json<Envelope<Todo>>), ApiError> {
    #[cfg(feature = "tracing")]
    info!(name = %fields.name, "Adding todo");
    let todo = state.store.create(fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::single(201, "success", Some(todo))),
    ))
}

#[cfg_attr(feature = "tracing", instrument(skip(state, fields)))]
pub async fn update_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    TodoInput(fields): TodoInput,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    #[cfg(feature = "tracing")]
    info!(id = %raw_id, "Updating todo");
    let id = parse_id(&raw_id)?;
    let todo = state.store.update_by_id(id, fields).await?;
    Ok(Json(Envelope::single(200, "success updated todo", Some(todo))))
}

#[cfg_attr(feature = "tracing", instrument(skip(state)))]
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    #[cfg(feature = "tracing")]
    info!(id = %raw_id, "Deleting todo");
    let id = parse_id(&raw_id)?;
    let todo = state.store.delete_by_id(id).await?;
    Ok(Json(Envelope::single(
        200,
        format!("success delete Todo with id {raw_id}"),
        Some(todo),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_plain_numbers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id("-3").unwrap(), -3);
        assert_eq!(parse_id("+8").unwrap(), 8);
    }

    #[test]
    fn parse_id_keeps_leading_digits() {
        assert_eq!(parse_id("12abc").unwrap(), 12);
        assert_eq!(parse_id("  7").unwrap(), 7);
        assert_eq!(parse_id("1.5").unwrap(), 1);
    }

    #[test]
    fn parse_id_reads_hex_prefix() {
        assert_eq!(parse_id("0x1A").unwrap(), 26);
        assert_eq!(parse_id("-0XfFz").unwrap(), -255);
        assert_eq!(parse_id("0x1g").unwrap(), 1);
    }

    #[test]
    fn parse_id_rejects_non_numbers() {
        for raw in ["abc", "", "-", " x1", "id", "0x", "0xg"] {
            assert!(matches!(parse_id(raw), Err(ApiError::InvalidId)), "{raw:?}");
        }
    }
}
