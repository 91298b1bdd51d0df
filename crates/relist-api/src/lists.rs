//! Handlers for `/lists` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/lists` | Live lists ordered by name |
//! | `POST` | `/lists` | Body: `{"name":"..."}`; returns 201 + the new list |
//! | `GET`  | `/lists/:id` | Todos split into unfinished and completed |
//! | `PUT`  | `/lists/:id` | Body: `{"name":"..."}` |
//! | `POST` | `/lists/:id/delete` | 204; history is kept |
//! | `POST` | `/lists/:id/todos` | Body: `{"descriptions":[...]}`; blank entries skipped |
//! | `GET`  | `/lists/:id/revisions` | Newest first; 404 if the list never existed |
//! | `GET`  | `/lists/:id/as-of` | `?at=<RFC 3339>` |

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use relist_core::{
  id::ListId,
  list::{ListSummary, Todo, TodoList},
  revision::{ListRevision, ListRevisionSummary},
  store::ListStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  error::ApiError,
  extract::{Json, Path, Query},
};

/// Response body naming the list an operation landed on.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListRef {
  pub list_id: ListId,
}

/// `?at=` query accepted by the as-of endpoints.
#[derive(Debug, Deserialize)]
pub struct AsOfParams {
  pub at: DateTime<Utc>,
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /lists`
pub async fn list<S: ListStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<ListSummary>>, ApiError> {
  let lists = store.list_lists().await.map_err(ApiError::from_store)?;
  Ok(Json(lists))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NameBody {
  pub name: String,
}

/// `POST /lists`, body: `{"name":"Groceries"}`
pub async fn create<S: ListStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NameBody>,
) -> Result<impl IntoResponse, ApiError> {
  let list = store
    .create_list(body.name)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(list)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// A live list with its todos partitioned for display.
#[derive(Debug, Serialize)]
pub struct ListPage {
  pub list:       ListSummary,
  pub unfinished: Vec<Todo>,
  pub completed:  Vec<Todo>,
}

impl From<TodoList> for ListPage {
  fn from(list: TodoList) -> Self {
    Self {
      unfinished: list.filter_by_completed(false).cloned().collect(),
      completed:  list.filter_by_completed(true).cloned().collect(),
      list:       list.list,
    }
  }
}

/// `GET /lists/:id`
pub async fn get_one<S: ListStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<ListId>,
) -> Result<Json<ListPage>, ApiError> {
  let list = store
    .get_list(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("todo list {id} not found")))?;
  Ok(Json(ListPage::from(list)))
}

// ─── Rename ───────────────────────────────────────────────────────────────────

/// `PUT /lists/:id`, body: `{"name":"..."}`
pub async fn rename<S: ListStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<ListId>,
  Json(body): Json<NameBody>,
) -> Result<Json<TodoList>, ApiError> {
  let list = store
    .rename_list(id, body.name)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(list))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `POST /lists/:id/delete`
pub async fn delete<S: ListStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<ListId>,
) -> Result<StatusCode, ApiError> {
  store.delete_list(id).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Add todos ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddTodosBody {
  pub descriptions: Vec<String>,
}

/// `POST /lists/:id/todos`: returns 201 + the todos actually added.
pub async fn add_todos<S: ListStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<ListId>,
  Json(body): Json<AddTodosBody>,
) -> Result<impl IntoResponse, ApiError> {
  let todos = store
    .add_todos(id, body.descriptions)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(todos)))
}

// ─── History ──────────────────────────────────────────────────────────────────

/// `GET /lists/:id/revisions`
pub async fn revisions<S: ListStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<ListId>,
) -> Result<Json<Vec<ListRevisionSummary>>, ApiError> {
  let revisions = store
    .list_revisions(id)
    .await
    .map_err(ApiError::from_store)?;
  if revisions.is_empty() {
    return Err(ApiError::NotFound(format!("no revisions for todo list {id}")));
  }
  Ok(Json(revisions))
}

/// `GET /lists/:id/as-of?at=<instant>`
pub async fn as_of<S: ListStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<ListId>,
  Query(params): Query<AsOfParams>,
) -> Result<Json<ListRevision>, ApiError> {
  let revision = store
    .get_list_revision_as_of(id, params.at)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(revision))
}
