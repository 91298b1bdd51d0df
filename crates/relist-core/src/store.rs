//! The `ListStore` trait and its error contract.
//!
//! The trait is implemented by storage backends (e.g. `relist-store-sqlite`).
//! Higher layers (`relist-api`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  id::{ListId, ListRevisionId, TodoId, TodoRevisionId},
  list::{ListSummary, Todo, TodoList},
  revision::{ListRevision, ListRevisionSummary, TodoRevision},
  view::RevisionView,
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Backend-independent classification of a store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// A lookup found nothing, or a targeted mutation affected no rows.
  NotFound,
  /// A mutation meant to affect exactly one row affected several.
  IntegrityViolation,
  /// The caller supplied unusable input.
  InvalidInput,
  /// Statement, binding or driver failure.
  Query,
}

/// Implemented by every backend's error type.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> ErrorKind;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a relist store backend.
///
/// Every method runs in exactly one transaction: either all of its writes
/// commit or none do. Every write to a list or todo is archived by the backend
/// as a new revision.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ListStore: Send + Sync {
  type Error: StoreError;

  // ── Lists ─────────────────────────────────────────────────────────────

  fn create_list(
    &self,
    name: String,
  ) -> impl Future<Output = Result<TodoList, Self::Error>> + Send + '_;

  fn rename_list(
    &self,
    id: ListId,
    name: String,
  ) -> impl Future<Output = Result<TodoList, Self::Error>> + Send + '_;

  /// Delete a list and its todos. History is kept.
  fn delete_list(
    &self,
    id: ListId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve a live list with its todos. Returns `None` if not found.
  fn get_list(
    &self,
    id: ListId,
  ) -> impl Future<Output = Result<Option<TodoList>, Self::Error>> + Send + '_;

  /// All live lists, ordered by name.
  fn list_lists(
    &self,
  ) -> impl Future<Output = Result<Vec<ListSummary>, Self::Error>> + Send + '_;

  // ── Todos ─────────────────────────────────────────────────────────────

  /// Add todos to a list in one transaction; blank descriptions are skipped.
  fn add_todos(
    &self,
    list_id: ListId,
    descriptions: Vec<String>,
  ) -> impl Future<Output = Result<Vec<Todo>, Self::Error>> + Send + '_;

  fn set_todo_completed(
    &self,
    id: TodoId,
    completed: bool,
  ) -> impl Future<Output = Result<Todo, Self::Error>> + Send + '_;

  /// Delete a todo and return the list it belonged to.
  fn delete_todo(
    &self,
    id: TodoId,
  ) -> impl Future<Output = Result<ListId, Self::Error>> + Send + '_;

  // ── History ───────────────────────────────────────────────────────────

  /// Every revision of a list, newest first, including the live one.
  fn list_revisions(
    &self,
    list_id: ListId,
  ) -> impl Future<Output = Result<Vec<ListRevisionSummary>, Self::Error>> + Send + '_;

  fn get_list_revision(
    &self,
    id: ListRevisionId,
  ) -> impl Future<Output = Result<ListRevision, Self::Error>> + Send + '_;

  /// The list revision valid at `at`, with the todos valid at `at`.
  fn get_list_revision_as_of(
    &self,
    list_id: ListId,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<ListRevision, Self::Error>> + Send + '_;

  fn get_todo_revision(
    &self,
    id: TodoRevisionId,
  ) -> impl Future<Output = Result<TodoRevision, Self::Error>> + Send + '_;

  fn get_todo_revision_as_of(
    &self,
    todo_id: TodoId,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<TodoRevision, Self::Error>> + Send + '_;

  /// A list revision with restore flags computed against the live list, read
  /// in one consistent transaction.
  fn view_list_revision(
    &self,
    id: ListRevisionId,
  ) -> impl Future<Output = Result<RevisionView, Self::Error>> + Send + '_;

  // ── Restore ───────────────────────────────────────────────────────────

  /// Replace the live list and its todos with the snapshot in revision `id`.
  /// Always records a new revision, even when nothing changes.
  fn restore_list_to_revision(
    &self,
    id: ListRevisionId,
  ) -> impl Future<Output = Result<ListId, Self::Error>> + Send + '_;

  /// Replace one live todo with the snapshot in revision `id` and return the
  /// owning list.
  fn restore_todo_to_revision(
    &self,
    id: TodoRevisionId,
  ) -> impl Future<Output = Result<ListId, Self::Error>> + Send + '_;
}
