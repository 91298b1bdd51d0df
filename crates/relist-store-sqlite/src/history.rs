//! Read-only access to the history relations.
//!
//! A list revision's todos are the todo versions valid at the revision's own
//! `sys_lower`. Every todo change touches the list, so each list revision
//! starts at an instant where its todo set is consistent.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use relist_core::{
  id::{ListId, ListRevisionId, TodoId, TodoRevisionId},
  revision::{ListRevision, ListRevisionSummary, TodoRevision},
};

use crate::{
  Result,
  columns::{LIST_COLUMNS, REVISION_COLUMNS, TODO_COLUMNS},
  encode::{RawInterval, RawListRevision, RawTodoRevision},
  executor::{Params, Tx},
};

// ─── Statements ──────────────────────────────────────────────────────────────

/// `[sys_lower, sys_upper)` contains `:as_of`, on history alias `h`.
const VALID_AT: &str = "h.sys_lower <= :as_of AND (h.sys_upper IS NULL OR :as_of < h.sys_upper)";

fn list_revision_columns() -> String {
  format!("{}, {}", REVISION_COLUMNS.on_alias("h"), LIST_COLUMNS.on_alias("h"))
}

fn todo_revision_columns() -> String {
  format!("{}, {}", REVISION_COLUMNS.on_alias("h"), TODO_COLUMNS.on_alias("h"))
}

static SELECT_LIST_REVISIONS: LazyLock<String> = LazyLock::new(|| {
  format!(
    "SELECT {} FROM todo_lists_history h
     WHERE h.todo_list_id = :list_id
     ORDER BY h.sys_lower DESC",
    REVISION_COLUMNS.on_alias("h")
  )
});

static SELECT_LIST_REVISION: LazyLock<String> = LazyLock::new(|| {
  format!(
    "SELECT {} FROM todo_lists_history h WHERE h.history_id = :history_id",
    list_revision_columns()
  )
});

static SELECT_LIST_REVISION_AS_OF: LazyLock<String> = LazyLock::new(|| {
  format!(
    "SELECT {} FROM todo_lists_history h
     WHERE h.todo_list_id = :list_id AND {VALID_AT}",
    list_revision_columns()
  )
});

static SELECT_TODOS_OF_LIST_AS_OF: LazyLock<String> = LazyLock::new(|| {
  format!(
    "SELECT {} FROM todos_history h
     WHERE h.todo_list_id = :list_id AND {VALID_AT}
     ORDER BY h.description ASC, h.todo_id ASC",
    todo_revision_columns()
  )
});

static SELECT_TODO_REVISION: LazyLock<String> = LazyLock::new(|| {
  format!(
    "SELECT {} FROM todos_history h WHERE h.history_id = :history_id",
    todo_revision_columns()
  )
});

static SELECT_TODO_REVISION_AS_OF: LazyLock<String> = LazyLock::new(|| {
  format!(
    "SELECT {} FROM todos_history h
     WHERE h.todo_id = :todo_id AND {VALID_AT}",
    todo_revision_columns()
  )
});

// ─── List revisions ──────────────────────────────────────────────────────────

/// Every version of a list, newest first; the live one (if any) comes first
/// with an open interval. Unknown lists yield an empty vector.
pub fn list_revisions(tx: &Tx<'_>, list_id: ListId) -> Result<Vec<ListRevisionSummary>> {
  tx.fetch_many(
    &SELECT_LIST_REVISIONS,
    &Params::new().bind(":list_id", list_id),
    RawInterval::from_row,
  )?
  .into_iter()
  .map(|raw| {
    let (history_id, interval) = raw.decode()?;
    Ok(ListRevisionSummary { history_id: ListRevisionId::from(history_id), interval })
  })
  .collect()
}

pub fn get_list_revision_by_id(tx: &Tx<'_>, id: ListRevisionId) -> Result<ListRevision> {
  let mut revision = tx
    .fetch_one(
      &SELECT_LIST_REVISION,
      &Params::new().bind(":history_id", id),
      format_args!("todo list revision {id}"),
      RawListRevision::from_row,
    )?
    .into_revision()?;

  let as_of = revision.interval.sys_lower;
  attach_todos(tx, &mut revision, as_of)?;
  Ok(revision)
}

/// The list version valid at `as_of`, with the todos valid at `as_of`.
pub fn get_list_revision_as_of(
  tx: &Tx<'_>,
  list_id: ListId,
  as_of: DateTime<Utc>,
) -> Result<ListRevision> {
  let mut revision = tx
    .fetch_one(
      &SELECT_LIST_REVISION_AS_OF,
      &Params::new().bind(":list_id", list_id).bind(":as_of", as_of),
      format_args!("todo list {list_id} as of {as_of}"),
      RawListRevision::from_row,
    )?
    .into_revision()?;

  attach_todos(tx, &mut revision, as_of)?;
  Ok(revision)
}

/// Replace `revision.todos` with the todo versions of its list valid at
/// `as_of`, ordered by description.
pub fn attach_todos(tx: &Tx<'_>, revision: &mut ListRevision, as_of: DateTime<Utc>) -> Result<()> {
  revision.todos = tx
    .fetch_many(
      &SELECT_TODOS_OF_LIST_AS_OF,
      &Params::new().bind(":list_id", revision.list.id).bind(":as_of", as_of),
      RawTodoRevision::from_row,
    )?
    .into_iter()
    .map(RawTodoRevision::into_revision)
    .collect::<Result<_>>()?;
  Ok(())
}

// ─── Todo revisions ──────────────────────────────────────────────────────────

pub fn get_todo_revision_by_id(tx: &Tx<'_>, id: TodoRevisionId) -> Result<TodoRevision> {
  tx.fetch_one(
    &SELECT_TODO_REVISION,
    &Params::new().bind(":history_id", id),
    format_args!("todo revision {id}"),
    RawTodoRevision::from_row,
  )?
  .into_revision()
}

pub fn get_todo_revision_as_of(
  tx: &Tx<'_>,
  todo_id: TodoId,
  as_of: DateTime<Utc>,
) -> Result<TodoRevision> {
  tx.fetch_one(
    &SELECT_TODO_REVISION_AS_OF,
    &Params::new().bind(":todo_id", todo_id).bind(":as_of", as_of),
    format_args!("todo {todo_id} as of {as_of}"),
    RawTodoRevision::from_row,
  )?
  .into_revision()
}
