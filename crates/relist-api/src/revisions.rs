//! Handlers for revision endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/list-revisions/:id` | Revision with restore flags |
//! | `POST` | `/list-revisions/:id/restore` | Returns `{"list_id":"..."}` |
//! | `POST` | `/todo-revisions/:id/restore` | Returns `{"list_id":"..."}` |

use std::sync::Arc;

use axum::extract::State;
use relist_core::{
  id::{ListRevisionId, TodoRevisionId},
  store::ListStore,
  view::RevisionView,
};

use crate::{
  error::ApiError,
  extract::{Json, Path},
  lists::ListRef,
};

/// `GET /list-revisions/:id`
pub async fn view<S: ListStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<ListRevisionId>,
) -> Result<Json<RevisionView>, ApiError> {
  let view = store
    .view_list_revision(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(view))
}

/// `POST /list-revisions/:id/restore`
pub async fn restore_list<S: ListStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<ListRevisionId>,
) -> Result<Json<ListRef>, ApiError> {
  let list_id = store
    .restore_list_to_revision(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(ListRef { list_id }))
}

/// `POST /todo-revisions/:id/restore`
pub async fn restore_todo<S: ListStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<TodoRevisionId>,
) -> Result<Json<ListRef>, ApiError> {
  let list_id = store
    .restore_todo_to_revision(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(ListRef { list_id }))
}
