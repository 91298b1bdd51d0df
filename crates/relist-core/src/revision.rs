//! Revisions: immutable, time-bounded snapshots of lists and todos.
//!
//! Every version a row has ever had is kept in a history relation together
//! with its validity interval `[sys_lower, sys_upper)`. The live version is the
//! one whose `sys_upper` is still open. For one identity the intervals are
//! contiguous and never overlap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  id::{ListRevisionId, TodoRevisionId},
  list::{ListSummary, Todo},
};

// ─── Interval ────────────────────────────────────────────────────────────────

/// A half-open validity interval. `sys_upper` is `None` only for the version
/// that is live right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
  pub sys_lower: DateTime<Utc>,
  pub sys_upper: Option<DateTime<Utc>>,
}

impl Interval {
  pub fn is_open(&self) -> bool { self.sys_upper.is_none() }

  /// Whether `instant` falls inside `[sys_lower, sys_upper)`.
  pub fn contains(&self, instant: DateTime<Utc>) -> bool {
    self.sys_lower <= instant && self.sys_upper.is_none_or(|upper| instant < upper)
  }

  /// Whether `next` starts exactly where this interval ends.
  pub fn meets(&self, next: &Interval) -> bool {
    self.sys_upper == Some(next.sys_lower)
  }
}

// ─── List revisions ──────────────────────────────────────────────────────────

/// A list revision without its content; cheap to enumerate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRevisionSummary {
  pub history_id: ListRevisionId,
  pub interval:   Interval,
}

/// A full list snapshot: the list's attributes during `interval` plus the
/// todos that were live at the start of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRevision {
  pub history_id: ListRevisionId,
  pub interval:   Interval,
  pub list:       ListSummary,
  /// Ordered by description, then todo id.
  pub todos:      Vec<TodoRevision>,
}

impl ListRevision {
  pub fn filter_by_completed(
    &self,
    completed: bool,
  ) -> impl Iterator<Item = &TodoRevision> + '_ {
    self.todos.iter().filter(move |t| t.todo.completed == completed)
  }
}

// ─── Todo revisions ──────────────────────────────────────────────────────────

/// One archived (or live) version of a todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRevision {
  pub history_id: TodoRevisionId,
  pub interval:   Interval,
  pub todo:       Todo,
}
