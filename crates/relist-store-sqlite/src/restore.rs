//! Restoring a list, or a single todo, to an earlier revision.
//!
//! A restore deletes the live row and inserts a copy of the snapshot, all in
//! the caller's transaction. It therefore always records a new revision, even
//! when the live content already equals the snapshot. Errors are passed
//! through unchanged; the enclosing transaction rolls back on any of them.

use relist_core::id::{ListId, ListRevisionId, TodoRevisionId};
use tracing::{debug, info};

use crate::{
  Result, crud,
  executor::Tx,
  history::{get_list_revision_by_id, get_todo_revision_by_id},
};

/// Replace the live list and all of its todos with the snapshot recorded in
/// list revision `id`. Works for deleted lists too.
pub fn restore_list_to_revision(tx: &Tx<'_>, id: ListRevisionId) -> Result<ListId> {
  let revision = get_list_revision_by_id(tx, id)?;
  let list_id = revision.list.id;

  match crud::delete_list(tx, list_id) {
    Err(err) if err.is_not_found() => {
      debug!(%list_id, "list already gone, restoring from history");
    }
    other => {
      other?;
    }
  }

  crud::insert_list_row(tx, &revision.list)?;
  for todo in &revision.todos {
    crud::insert_todo_row(tx, &todo.todo)?;
  }

  info!(%list_id, revision = %id, todos = revision.todos.len(), "restored todo list");
  Ok(list_id)
}

/// Replace one live todo with the snapshot recorded in todo revision `id`,
/// then touch the owning list so its history records the change too.
pub fn restore_todo_to_revision(tx: &Tx<'_>, id: TodoRevisionId) -> Result<ListId> {
  let revision = get_todo_revision_by_id(tx, id)?;
  let todo = &revision.todo;

  match crud::delete_todo(tx, todo.id) {
    Err(err) if err.is_not_found() => {
      debug!(todo_id = %todo.id, "todo already gone, restoring from history");
    }
    other => {
      other?;
    }
  }

  crud::insert_todo_row(tx, todo)?;
  crud::touch_list(tx, todo.list_id)?;

  info!(todo_id = %todo.id, list_id = %todo.list_id, revision = %id, "restored todo");
  Ok(todo.list_id)
}
