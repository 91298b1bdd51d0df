//! Plain create/read/update/delete on live rows.
//!
//! Every targeted mutation goes through [`Tx::mutate_exactly_one`]. Any change
//! to a todo also touches its list, which makes the versioning triggers record
//! a new list revision alongside the todo revision.

use std::sync::LazyLock;

use relist_core::{
  id::{ListId, TodoId},
  list::{ListSummary, Todo, TodoList, normalize_descriptions, normalize_name},
};

use crate::{
  Error, Result,
  columns::{LIST_COLUMNS, TODO_COLUMNS},
  encode::{RawList, RawTodo},
  executor::{Params, Tx},
};

// ─── Statements ──────────────────────────────────────────────────────────────

static SELECT_LIST: LazyLock<String> = LazyLock::new(|| {
  format!(
    "SELECT {} FROM todo_lists tl WHERE tl.todo_list_id = :list_id",
    LIST_COLUMNS.on_alias("tl")
  )
});

static SELECT_ALL_LISTS: LazyLock<String> = LazyLock::new(|| {
  format!(
    "SELECT {} FROM todo_lists tl ORDER BY tl.name, tl.todo_list_id",
    LIST_COLUMNS.on_alias("tl")
  )
});

static INSERT_LIST: LazyLock<String> = LazyLock::new(|| {
  format!(
    "INSERT INTO todo_lists ({}) VALUES ({})",
    LIST_COLUMNS.joined(),
    LIST_COLUMNS.placeholders()
  )
});

static SELECT_TODOS_OF_LIST: LazyLock<String> = LazyLock::new(|| {
  format!(
    "SELECT {} FROM todos t
     WHERE t.todo_list_id = :list_id
     ORDER BY t.description ASC, t.todo_id ASC",
    TODO_COLUMNS.on_alias("t")
  )
});

static SELECT_TODO: LazyLock<String> = LazyLock::new(|| {
  format!(
    "SELECT {} FROM todos t WHERE t.todo_id = :todo_id",
    TODO_COLUMNS.on_alias("t")
  )
});

static INSERT_TODO: LazyLock<String> = LazyLock::new(|| {
  format!(
    "INSERT INTO todos ({}) VALUES ({})",
    TODO_COLUMNS.joined(),
    TODO_COLUMNS.placeholders()
  )
});

// ─── Lists ───────────────────────────────────────────────────────────────────

pub fn create_list(tx: &Tx<'_>, name: &str) -> Result<TodoList> {
  let now = tx.now();
  let list = ListSummary {
    id:         ListId::new(),
    name:       normalize_name(name)?,
    created_at: now,
    updated_at: now,
  };
  insert_list_row(tx, &list)?;
  Ok(TodoList { list, todos: Vec::new() })
}

/// Insert a live list row carrying exactly these attributes.
pub fn insert_list_row(tx: &Tx<'_>, list: &ListSummary) -> Result<()> {
  tx.mutate_exactly_one(
    &INSERT_LIST,
    &Params::new()
      .bind(":todo_list_id", list.id)
      .bind(":name", &list.name)
      .bind(":created_at", list.created_at)
      .bind(":updated_at", list.updated_at),
  )
}

pub fn find_list(tx: &Tx<'_>, id: ListId) -> Result<Option<TodoList>> {
  let Some(raw) = tx.fetch_optional(
    &SELECT_LIST,
    &Params::new().bind(":list_id", id),
    |row| RawList::from_row(row, 0),
  )?
  else {
    return Ok(None);
  };

  let list = raw.into_summary()?;
  let todos = todos_of_list(tx, id)?;
  Ok(Some(TodoList { list, todos }))
}

pub fn get_list(tx: &Tx<'_>, id: ListId) -> Result<TodoList> {
  find_list(tx, id)?.ok_or_else(|| Error::not_found(format_args!("todo list {id}")))
}

pub fn list_lists(tx: &Tx<'_>) -> Result<Vec<ListSummary>> {
  tx.fetch_many(&SELECT_ALL_LISTS, &Params::new(), |row| RawList::from_row(row, 0))?
    .into_iter()
    .map(RawList::into_summary)
    .collect()
}

pub fn rename_list(tx: &Tx<'_>, id: ListId, name: &str) -> Result<TodoList> {
  tx.mutate_exactly_one(
    "UPDATE todo_lists
        SET name = :name, updated_at = :now
      WHERE todo_list_id = :list_id",
    &Params::new()
      .bind(":name", normalize_name(name)?)
      .bind(":now", tx.now())
      .bind(":list_id", id),
  )?;
  get_list(tx, id)
}

/// Delete the list's todos, then the list row. Fails with
/// [`Error::NotFound`] when the list does not exist.
pub fn delete_list(tx: &Tx<'_>, id: ListId) -> Result<()> {
  tx.execute(
    "DELETE FROM todos WHERE todo_list_id = :list_id",
    &Params::new().bind(":list_id", id),
  )?;
  tx.mutate_exactly_one(
    "DELETE FROM todo_lists WHERE todo_list_id = :list_id",
    &Params::new().bind(":list_id", id),
  )
}

fn todos_of_list(tx: &Tx<'_>, id: ListId) -> Result<Vec<Todo>> {
  tx.fetch_many(
    &SELECT_TODOS_OF_LIST,
    &Params::new().bind(":list_id", id),
    |row| RawTodo::from_row(row, 0),
  )?
  .into_iter()
  .map(RawTodo::into_todo)
  .collect()
}

// ─── Cascade touch ───────────────────────────────────────────────────────────

/// Bump the list's `updated_at`, forcing a new list revision.
pub fn touch_list(tx: &Tx<'_>, id: ListId) -> Result<()> {
  tx.mutate_exactly_one(
    "UPDATE todo_lists SET updated_at = :now WHERE todo_list_id = :list_id",
    &Params::new().bind(":now", tx.now()).bind(":list_id", id),
  )
}

/// [`touch_list`] for the list owning `todo_id`. Fails with
/// [`Error::NotFound`] when the todo does not exist.
pub fn touch_list_of_todo(tx: &Tx<'_>, todo_id: TodoId) -> Result<()> {
  tx.mutate_exactly_one(
    "UPDATE todo_lists
        SET updated_at = :now
      WHERE todo_list_id = (SELECT todo_list_id FROM todos WHERE todo_id = :todo_id)",
    &Params::new().bind(":now", tx.now()).bind(":todo_id", todo_id),
  )
}

// ─── Todos ───────────────────────────────────────────────────────────────────

pub fn add_todo(tx: &Tx<'_>, list_id: ListId, description: &str) -> Result<Todo> {
  // Touch first so a missing list reads as not-found rather than as a
  // foreign key failure.
  touch_list(tx, list_id)?;

  let todo = Todo {
    id: TodoId::new(),
    list_id,
    description: description.to_owned(),
    created_at: tx.now(),
    completed: false,
  };
  insert_todo_row(tx, &todo)?;
  Ok(todo)
}

/// Add several todos in the caller's transaction, skipping blank
/// descriptions. The list ends up with a single new revision.
pub fn add_todos(tx: &Tx<'_>, list_id: ListId, descriptions: &[String]) -> Result<Vec<Todo>> {
  normalize_descriptions(descriptions)?
    .iter()
    .map(|d| add_todo(tx, list_id, d))
    .collect()
}

/// Insert a live todo row carrying exactly these attributes. Does not touch
/// the list.
pub fn insert_todo_row(tx: &Tx<'_>, todo: &Todo) -> Result<()> {
  tx.mutate_exactly_one(
    &INSERT_TODO,
    &Params::new()
      .bind(":todo_id", todo.id)
      .bind(":todo_list_id", todo.list_id)
      .bind(":description", &todo.description)
      .bind(":created_at", todo.created_at)
      .bind(":completed", todo.completed),
  )
}

pub fn get_todo(tx: &Tx<'_>, id: TodoId) -> Result<Todo> {
  tx.fetch_one(
    &SELECT_TODO,
    &Params::new().bind(":todo_id", id),
    format_args!("todo {id}"),
    |row| RawTodo::from_row(row, 0),
  )?
  .into_todo()
}

pub fn set_todo_completed(tx: &Tx<'_>, id: TodoId, completed: bool) -> Result<Todo> {
  tx.mutate_exactly_one(
    "UPDATE todos SET completed = :completed WHERE todo_id = :todo_id",
    &Params::new().bind(":completed", completed).bind(":todo_id", id),
  )?;
  touch_list_of_todo(tx, id)?;
  get_todo(tx, id)
}

/// Touch the owning list, then delete the todo. Returns the owning list.
pub fn delete_todo(tx: &Tx<'_>, id: TodoId) -> Result<ListId> {
  let todo = get_todo(tx, id)?;
  touch_list(tx, todo.list_id)?;
  tx.mutate_exactly_one(
    "DELETE FROM todos WHERE todo_id = :todo_id",
    &Params::new().bind(":todo_id", id),
  )?;
  Ok(todo.list_id)
}
