//! JSON HTTP API for relist.
//!
//! Exposes an axum [`Router`] backed by any [`relist_core::store::ListStore`].
//! Every handler maps to one store operation; TLS and auth are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", relist_api::api_router(store.clone()))
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod lists;
pub mod revisions;
pub mod todos;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use relist_core::store::ListStore;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ListStore + 'static,
{
  Router::new()
    // Lists
    .route("/lists", get(lists::list::<S>).post(lists::create::<S>))
    .route("/lists/{id}", get(lists::get_one::<S>).put(lists::rename::<S>))
    .route("/lists/{id}/delete", post(lists::delete::<S>))
    .route("/lists/{id}/todos", post(lists::add_todos::<S>))
    .route("/lists/{id}/revisions", get(lists::revisions::<S>))
    .route("/lists/{id}/as-of", get(lists::as_of::<S>))
    // Todos
    .route("/todos/{id}/complete", post(todos::complete::<S>))
    .route("/todos/{id}/reactivate", post(todos::reactivate::<S>))
    .route("/todos/{id}/delete", post(todos::delete::<S>))
    .route("/todos/{id}/as-of", get(todos::as_of::<S>))
    // Revisions
    .route("/list-revisions/{id}", get(revisions::view::<S>))
    .route("/list-revisions/{id}/restore", post(revisions::restore_list::<S>))
    .route("/todo-revisions/{id}/restore", post(revisions::restore_todo::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(store)
}

// ─── Router tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use relist_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(
    app:    &Router,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(json) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string())),
      None => builder.body(Body::empty()),
    }
    .unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn create_list(app: &Router, name: &str) -> String {
    let (status, body) = send(app, "POST", "/lists", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["list"]["id"].as_str().unwrap().to_string()
  }

  // ── Lists ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_then_get_list() {
    let app = app().await;
    let id = create_list(&app, "Groceries").await;

    let (status, body) = send(&app, "GET", &format!("/lists/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["list"]["name"], "Groceries");
    assert_eq!(body["unfinished"], json!([]));
    assert_eq!(body["completed"], json!([]));

    let (status, body) = send(&app, "GET", "/lists", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn blank_name_is_bad_request() {
    let app = app().await;
    let (status, body) = send(&app, "POST", "/lists", Some(json!({ "name": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn unknown_list_is_not_found() {
    let app = app().await;
    let uri = "/lists/00000000-0000-0000-0000-000000000000";
    let (status, body) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "GET", &format!("{uri}/revisions"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", &format!("{uri}/delete"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn malformed_id_is_rejected() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/lists/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "POST", "/todo-revisions/42/restore", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn malformed_query_and_body_are_rejected() {
    let app = app().await;
    let id = create_list(&app, "Groceries").await;

    let (status, body) = send(&app, "GET", &format!("/lists/{id}/as-of?at=yesterday"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(
      &app,
      "POST",
      &format!("/lists/{id}/todos"),
      Some(json!({ "description": "Milk" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn todos_split_by_completion() {
    let app = app().await;
    let id = create_list(&app, "Groceries").await;
    let (status, todos) = send(
      &app,
      "POST",
      &format!("/lists/{id}/todos"),
      Some(json!({ "descriptions": ["Milk", " ", "Eggs"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(todos.as_array().unwrap().len(), 2);

    let milk = todos
      .as_array()
      .unwrap()
      .iter()
      .find(|t| t["description"] == "Milk")
      .unwrap()["id"]
      .as_str()
      .unwrap()
      .to_string();
    let (status, todo) = send(&app, "POST", &format!("/todos/{milk}/complete"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(todo["completed"], true);

    let (_, page) = send(&app, "GET", &format!("/lists/{id}"), None).await;
    assert_eq!(page["unfinished"][0]["description"], "Eggs");
    assert_eq!(page["completed"][0]["description"], "Milk");
  }

  // ── Restore ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn view_and_restore_revision() {
    let app = app().await;
    let id = create_list(&app, "Groceries").await;
    let (_, todos) = send(
      &app,
      "POST",
      &format!("/lists/{id}/todos"),
      Some(json!({ "descriptions": ["Milk"] })),
    )
    .await;
    let milk = todos[0]["id"].as_str().unwrap().to_string();
    send(&app, "POST", &format!("/todos/{milk}/complete"), None).await;

    let (status, revisions) = send(&app, "GET", &format!("/lists/{id}/revisions"), None).await;
    assert_eq!(status, StatusCode::OK);
    let revisions = revisions.as_array().unwrap();
    assert_eq!(revisions.len(), 3);
    let pre_complete = revisions[1]["history_id"].as_str().unwrap().to_string();

    let (status, view) = send(&app, "GET", &format!("/list-revisions/{pre_complete}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["restorable"], true);
    assert_eq!(view["unfinished"][0]["restorable"], true);

    let (status, body) = send(
      &app,
      "POST",
      &format!("/list-revisions/{pre_complete}/restore"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["list_id"], id.as_str());

    let (_, page) = send(&app, "GET", &format!("/lists/{id}"), None).await;
    assert_eq!(page["unfinished"][0]["id"], milk.as_str());
    assert_eq!(page["completed"], json!([]));
  }

  #[tokio::test]
  async fn restore_deleted_todo_through_as_of() {
    let app = app().await;
    let id = create_list(&app, "Groceries").await;
    let (_, todos) = send(
      &app,
      "POST",
      &format!("/lists/{id}/todos"),
      Some(json!({ "descriptions": ["Milk"] })),
    )
    .await;
    let milk = todos[0]["id"].as_str().unwrap().to_string();
    let created = todos[0]["created_at"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "POST", &format!("/todos/{milk}/delete"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["list_id"], id.as_str());

    let at = created.replace('+', "%2B");
    let (status, revision) =
      send(&app, "GET", &format!("/todos/{milk}/as-of?at={at}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let history_id = revision["history_id"].as_str().unwrap().to_string();

    let (status, _) = send(
      &app,
      "POST",
      &format!("/todo-revisions/{history_id}/restore"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, page) = send(&app, "GET", &format!("/lists/{id}"), None).await;
    assert_eq!(page["unfinished"][0]["id"], milk.as_str());
  }

  #[tokio::test]
  async fn restore_unknown_revision_is_not_found() {
    let app = app().await;
    let uri = "/list-revisions/00000000-0000-0000-0000-000000000000/restore";
    let (status, _) = send(&app, "POST", uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
