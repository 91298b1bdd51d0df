//! [`SqliteStore`], the SQLite implementation of [`ListStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use relist_core::{
  id::{ListId, ListRevisionId, TodoId, TodoRevisionId},
  list::{ListSummary, Todo, TodoList},
  revision::{ListRevision, ListRevisionSummary, TodoRevision},
  store::ListStore,
  view::RevisionView,
};

use crate::{
  Error, Result, crud,
  executor::{Tx, TxMode, run_in_tx},
  history, restore,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A relist store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All
/// operations are serialised on the connection's thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` as one read transaction on the connection thread.
  pub async fn read<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Tx<'_>) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self
      .conn
      .call(move |conn| Ok(run_in_tx(conn, TxMode::Read, f)))
      .await?
  }

  /// Run `f` as one write transaction on the connection thread.
  pub async fn write<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Tx<'_>) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self
      .conn
      .call(move |conn| Ok(run_in_tx(conn, TxMode::Write, f)))
      .await?
  }
}

// ─── ListStore impl ──────────────────────────────────────────────────────────

impl ListStore for SqliteStore {
  type Error = Error;

  // ── Lists ─────────────────────────────────────────────────────────────────

  async fn create_list(&self, name: String) -> Result<TodoList> {
    self.write(move |tx| crud::create_list(tx, &name)).await
  }

  async fn rename_list(&self, id: ListId, name: String) -> Result<TodoList> {
    self.write(move |tx| crud::rename_list(tx, id, &name)).await
  }

  async fn delete_list(&self, id: ListId) -> Result<()> {
    self.write(move |tx| crud::delete_list(tx, id)).await
  }

  async fn get_list(&self, id: ListId) -> Result<Option<TodoList>> {
    self.read(move |tx| crud::find_list(tx, id)).await
  }

  async fn list_lists(&self) -> Result<Vec<ListSummary>> {
    self.read(crud::list_lists).await
  }

  // ── Todos ─────────────────────────────────────────────────────────────────

  async fn add_todos(&self, list_id: ListId, descriptions: Vec<String>) -> Result<Vec<Todo>> {
    self
      .write(move |tx| crud::add_todos(tx, list_id, &descriptions))
      .await
  }

  async fn set_todo_completed(&self, id: TodoId, completed: bool) -> Result<Todo> {
    self
      .write(move |tx| crud::set_todo_completed(tx, id, completed))
      .await
  }

  async fn delete_todo(&self, id: TodoId) -> Result<ListId> {
    self.write(move |tx| crud::delete_todo(tx, id)).await
  }

  // ── History ───────────────────────────────────────────────────────────────

  async fn list_revisions(&self, list_id: ListId) -> Result<Vec<ListRevisionSummary>> {
    self
      .read(move |tx| history::list_revisions(tx, list_id))
      .await
  }

  async fn get_list_revision(&self, id: ListRevisionId) -> Result<ListRevision> {
    self
      .read(move |tx| history::get_list_revision_by_id(tx, id))
      .await
  }

  async fn get_list_revision_as_of(
    &self,
    list_id: ListId,
    at: DateTime<Utc>,
  ) -> Result<ListRevision> {
    self
      .read(move |tx| history::get_list_revision_as_of(tx, list_id, at))
      .await
  }

  async fn get_todo_revision(&self, id: TodoRevisionId) -> Result<TodoRevision> {
    self
      .read(move |tx| history::get_todo_revision_by_id(tx, id))
      .await
  }

  async fn get_todo_revision_as_of(
    &self,
    todo_id: TodoId,
    at: DateTime<Utc>,
  ) -> Result<TodoRevision> {
    self
      .read(move |tx| history::get_todo_revision_as_of(tx, todo_id, at))
      .await
  }

  async fn view_list_revision(&self, id: ListRevisionId) -> Result<RevisionView> {
    self
      .read(move |tx| {
        let revision = history::get_list_revision_by_id(tx, id)?;
        let current = crud::find_list(tx, revision.list.id)?;
        Ok(RevisionView::new(revision, current.as_ref()))
      })
      .await
  }

  // ── Restore ───────────────────────────────────────────────────────────────

  async fn restore_list_to_revision(&self, id: ListRevisionId) -> Result<ListId> {
    self
      .write(move |tx| restore::restore_list_to_revision(tx, id))
      .await
  }

  async fn restore_todo_to_revision(&self, id: TodoRevisionId) -> Result<ListId> {
    self
      .write(move |tx| restore::restore_todo_to_revision(tx, id))
      .await
  }
}
