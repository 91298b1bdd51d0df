//! Deciding whether a historical todo snapshot differs from the live todo.
//!
//! These checks only drive which restore actions are offered to a user; they
//! never gate a restore itself.
//!
//! Matching is keyed on todo identity, not content. A todo that was deleted
//! and later re-added with the same text has a new identity, so its old
//! revision still counts as stale and restoring it yields a duplicate.

use std::collections::HashMap;

use crate::{
  id::TodoId,
  list::{Todo, TodoList},
  revision::TodoRevision,
};

/// The live todos of one list, keyed by identity.
#[derive(Debug, Clone, Default)]
pub struct CurrentTodos {
  by_id: HashMap<TodoId, Todo>,
}

impl CurrentTodos {
  pub fn new(todos: impl IntoIterator<Item = Todo>) -> Self {
    Self { by_id: todos.into_iter().map(|t| (t.id, t)).collect() }
  }

  /// The todos of `list`, or an empty set when the list no longer exists.
  pub fn of_list(list: Option<&TodoList>) -> Self {
    list.map(|l| Self::new(l.todos.iter().cloned())).unwrap_or_default()
  }

  pub fn get(&self, id: TodoId) -> Option<&Todo> { self.by_id.get(&id) }

  pub fn len(&self) -> usize { self.by_id.len() }

  pub fn is_empty(&self) -> bool { self.by_id.is_empty() }
}

/// Whether restoring `revision` would change anything.
///
/// The live version is never stale. Otherwise the revision is stale when no
/// live todo has its identity, or when the live todo's attributes differ.
pub fn is_stale(revision: &TodoRevision, current: &CurrentTodos) -> bool {
  if revision.interval.is_open() {
    return false;
  }
  current.get(revision.todo.id) != Some(&revision.todo)
}

/// Whether a list revision's todos all match the live todos, i.e. there is
/// nothing to restore at list level.
///
/// Requires equal cardinality and no stale todo. Two empty sets match.
pub fn all_up_to_date(revisions: &[TodoRevision], current: &CurrentTodos) -> bool {
  revisions.len() == current.len() && !revisions.iter().any(|r| is_stale(r, current))
}
