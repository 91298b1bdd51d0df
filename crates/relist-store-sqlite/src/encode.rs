//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as fixed-width RFC 3339 UTC strings with
//! microsecond precision. UUIDs are stored as hyphenated lowercase strings.
//! Booleans are stored as 0/1 integers.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use relist_core::{
  id::{ListId, ListRevisionId, TodoId, TodoRevisionId},
  list::{ListSummary, Todo},
  revision::{Interval, ListRevision, TodoRevision},
};
use rusqlite::{Row, types::Value};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// Drop precision below what the database stores, so a timestamp read back
/// compares equal to the one written.
pub fn to_storage_precision(dt: DateTime<Utc>) -> DateTime<Utc> { dt.trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Parameter values ────────────────────────────────────────────────────────

/// Conversion of a domain value into the SQLite value bound to a named
/// parameter.
pub trait Bind {
  fn to_sql_value(&self) -> Value;
}

macro_rules! bind_id {
  ($($ty:ty),*) => {
    $(
      impl Bind for $ty {
        fn to_sql_value(&self) -> Value { Value::Text(encode_uuid(self.as_uuid())) }
      }
    )*
  };
}

bind_id!(ListId, TodoId, ListRevisionId, TodoRevisionId);

impl Bind for DateTime<Utc> {
  fn to_sql_value(&self) -> Value { Value::Text(encode_dt(*self)) }
}

impl Bind for bool {
  fn to_sql_value(&self) -> Value { Value::Integer(i64::from(*self)) }
}

impl Bind for str {
  fn to_sql_value(&self) -> Value { Value::Text(self.to_owned()) }
}

impl Bind for String {
  fn to_sql_value(&self) -> Value { Value::Text(self.clone()) }
}

impl<T: Bind + ?Sized> Bind for &T {
  fn to_sql_value(&self) -> Value { (**self).to_sql_value() }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read from the list columns of a row, starting at `offset`.
pub struct RawList {
  pub todo_list_id: String,
  pub name:         String,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawList {
  pub fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      todo_list_id: row.get(offset)?,
      name:         row.get(offset + 1)?,
      created_at:   row.get(offset + 2)?,
      updated_at:   row.get(offset + 3)?,
    })
  }

  pub fn into_summary(self) -> Result<ListSummary> {
    Ok(ListSummary {
      id:         ListId::from(decode_uuid(&self.todo_list_id)?),
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read from the todo columns of a row, starting at `offset`.
pub struct RawTodo {
  pub todo_id:      String,
  pub todo_list_id: String,
  pub description:  String,
  pub created_at:   String,
  pub completed:    bool,
}

impl RawTodo {
  pub fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      todo_id:      row.get(offset)?,
      todo_list_id: row.get(offset + 1)?,
      description:  row.get(offset + 2)?,
      created_at:   row.get(offset + 3)?,
      completed:    row.get(offset + 4)?,
    })
  }

  pub fn into_todo(self) -> Result<Todo> {
    Ok(Todo {
      id:          TodoId::from(decode_uuid(&self.todo_id)?),
      list_id:     ListId::from(decode_uuid(&self.todo_list_id)?),
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
      completed:   self.completed,
    })
  }
}

/// Raw revision identity and interval, always the first three columns.
pub struct RawInterval {
  pub history_id: String,
  pub sys_lower:  String,
  pub sys_upper:  Option<String>,
}

impl RawInterval {
  /// Number of columns consumed by [`RawInterval::from_row`].
  pub const WIDTH: usize = 3;

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      history_id: row.get(0)?,
      sys_lower:  row.get(1)?,
      sys_upper:  row.get(2)?,
    })
  }

  pub fn decode(self) -> Result<(Uuid, Interval)> {
    let interval = Interval {
      sys_lower: decode_dt(&self.sys_lower)?,
      sys_upper: self.sys_upper.as_deref().map(decode_dt).transpose()?,
    };
    Ok((decode_uuid(&self.history_id)?, interval))
  }
}

/// A `todo_lists_history` row.
pub struct RawListRevision {
  pub revision: RawInterval,
  pub list:     RawList,
}

impl RawListRevision {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      revision: RawInterval::from_row(row)?,
      list:     RawList::from_row(row, RawInterval::WIDTH)?,
    })
  }

  /// Decode without todos; they are attached by a separate query.
  pub fn into_revision(self) -> Result<ListRevision> {
    let (history_id, interval) = self.revision.decode()?;
    Ok(ListRevision {
      history_id: ListRevisionId::from(history_id),
      interval,
      list: self.list.into_summary()?,
      todos: Vec::new(),
    })
  }
}

/// A `todos_history` row.
pub struct RawTodoRevision {
  pub revision: RawInterval,
  pub todo:     RawTodo,
}

impl RawTodoRevision {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      revision: RawInterval::from_row(row)?,
      todo:     RawTodo::from_row(row, RawInterval::WIDTH)?,
    })
  }

  pub fn into_revision(self) -> Result<TodoRevision> {
    let (history_id, interval) = self.revision.decode()?;
    Ok(TodoRevision {
      history_id: TodoRevisionId::from(history_id),
      interval,
      todo: self.todo.into_todo()?,
    })
  }
}
