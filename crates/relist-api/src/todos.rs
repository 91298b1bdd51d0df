//! Handlers for `/todos` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/todos/:id/complete` | Returns the updated todo |
//! | `POST` | `/todos/:id/reactivate` | Returns the updated todo |
//! | `POST` | `/todos/:id/delete` | Returns `{"list_id":"..."}` |
//! | `GET`  | `/todos/:id/as-of` | `?at=<RFC 3339>` |

use std::sync::Arc;

use axum::extract::State;
use relist_core::{id::TodoId, list::Todo, revision::TodoRevision, store::ListStore};

use crate::{
  error::ApiError,
  extract::{Json, Path, Query},
  lists::{AsOfParams, ListRef},
};

async fn set_completed<S: ListStore>(
  store: &S,
  id: TodoId,
  completed: bool,
) -> Result<Json<Todo>, ApiError> {
  let todo = store
    .set_todo_completed(id, completed)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(todo))
}

/// `POST /todos/:id/complete`
pub async fn complete<S: ListStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<TodoId>,
) -> Result<Json<Todo>, ApiError> {
  set_completed(store.as_ref(), id, true).await
}

/// `POST /todos/:id/reactivate`
pub async fn reactivate<S: ListStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<TodoId>,
) -> Result<Json<Todo>, ApiError> {
  set_completed(store.as_ref(), id, false).await
}

/// `POST /todos/:id/delete`
pub async fn delete<S: ListStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<TodoId>,
) -> Result<Json<ListRef>, ApiError> {
  let list_id = store.delete_todo(id).await.map_err(ApiError::from_store)?;
  Ok(Json(ListRef { list_id }))
}

/// `GET /todos/:id/as-of?at=<instant>`
pub async fn as_of<S: ListStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<TodoId>,
  Query(params): Query<AsOfParams>,
) -> Result<Json<TodoRevision>, ApiError> {
  let revision = store
    .get_todo_revision_as_of(id, params.at)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(revision))
}
