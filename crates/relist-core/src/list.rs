//! Live todo lists and todos.
//!
//! A list owns its todos. Todos carry no timestamp of their own beyond
//! creation; every change to a todo bumps the owning list's `updated_at`, so
//! the list's history also records what its todo set looked like.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  id::{ListId, TodoId},
};

// ─── Lists ───────────────────────────────────────────────────────────────────

/// The attributes of a list row, without its todos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSummary {
  pub id:         ListId,
  pub name:       String,
  pub created_at: DateTime<Utc>,
  /// Advanced on every change to the list or to any of its todos.
  pub updated_at: DateTime<Utc>,
}

/// A list together with its current todos, ordered by description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
  pub list:  ListSummary,
  pub todos: Vec<Todo>,
}

impl TodoList {
  pub fn id(&self) -> ListId { self.list.id }

  /// Todos whose completion flag equals `completed`, in list order.
  pub fn filter_by_completed(
    &self,
    completed: bool,
  ) -> impl Iterator<Item = &Todo> + '_ {
    self.todos.iter().filter(move |t| t.completed == completed)
  }
}

// ─── Todos ───────────────────────────────────────────────────────────────────

/// A single todo item. Equality is attribute-wise over every field, which is
/// what the staleness check relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
  pub id:          TodoId,
  pub list_id:     ListId,
  pub description: String,
  pub created_at:  DateTime<Utc>,
  pub completed:   bool,
}

// ─── Input validation ────────────────────────────────────────────────────────

/// Trim a list name and reject it if nothing is left.
pub fn normalize_name(name: &str) -> Result<String> {
  let name = name.trim();
  if name.is_empty() {
    return Err(Error::InvalidInput("list name must not be empty".into()));
  }
  Ok(name.to_owned())
}

/// Trim each description and drop the blank ones. Fails when nothing remains.
pub fn normalize_descriptions<I, S>(descriptions: I) -> Result<Vec<String>>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let cleaned: Vec<String> = descriptions
    .into_iter()
    .map(|d| d.as_ref().trim().to_owned())
    .filter(|d| !d.is_empty())
    .collect();

  if cleaned.is_empty() {
    return Err(Error::InvalidInput("must have some todos".into()));
  }
  Ok(cleaned)
}
