//! A list revision annotated with the restore actions worth offering.

use serde::Serialize;

use crate::{
  id::ListRevisionId,
  list::{ListSummary, TodoList},
  revision::{Interval, ListRevision, TodoRevision},
  staleness::{CurrentTodos, all_up_to_date, is_stale},
};

/// A todo snapshot and whether restoring it would change the live list.
#[derive(Debug, Clone, Serialize)]
pub struct TodoRevisionView {
  pub revision:   TodoRevision,
  pub restorable: bool,
}

/// A list revision split into unfinished and completed todos, with restore
/// flags computed against the live list.
#[derive(Debug, Clone, Serialize)]
pub struct RevisionView {
  pub history_id: ListRevisionId,
  pub interval:   Interval,
  pub list:       ListSummary,
  /// Offer restoring the whole list to this revision.
  pub restorable: bool,
  /// Whether the list still exists; single todos can only be restored into a
  /// live list.
  pub list_live:  bool,
  pub unfinished: Vec<TodoRevisionView>,
  pub completed:  Vec<TodoRevisionView>,
}

impl RevisionView {
  pub fn new(revision: ListRevision, current: Option<&TodoList>) -> Self {
    let live = CurrentTodos::of_list(current);
    let list_live = current.is_some();

    let annotate = |rev: &TodoRevision| TodoRevisionView {
      revision:   rev.clone(),
      restorable: list_live && is_stale(rev, &live),
    };

    Self {
      history_id: revision.history_id,
      interval: revision.interval,
      restorable: !all_up_to_date(&revision.todos, &live),
      list_live,
      unfinished: revision.filter_by_completed(false).map(annotate).collect(),
      completed: revision.filter_by_completed(true).map(annotate).collect(),
      list: revision.list,
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone, Utc};

  use super::*;
  use crate::{
    id::{ListId, TodoId, TodoRevisionId},
    list::Todo,
  };

  fn fixture() -> (ListRevision, TodoList) {
    let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let summary = ListSummary {
      id:         ListId::new(),
      name:       "Groceries".into(),
      created_at: at,
      updated_at: at,
    };
    let milk = Todo {
      id:          TodoId::new(),
      list_id:     summary.id,
      description: "Milk".into(),
      created_at:  at,
      completed:   false,
    };
    let revision = ListRevision {
      history_id: ListRevisionId::new(),
      interval:   Interval { sys_lower: at, sys_upper: Some(at + Duration::seconds(5)) },
      list:       summary.clone(),
      todos:      vec![TodoRevision {
        history_id: TodoRevisionId::new(),
        interval:   Interval { sys_lower: at, sys_upper: Some(at + Duration::seconds(5)) },
        todo:       milk.clone(),
      }],
    };
    let mut done = milk;
    done.completed = true;
    (revision, TodoList { list: summary, todos: vec![done] })
  }

  #[test]
  fn changed_todo_is_offered_for_restore() {
    let (revision, current) = fixture();
    let view = RevisionView::new(revision, Some(&current));
    assert!(view.restorable);
    assert!(view.list_live);
    assert_eq!(view.unfinished.len(), 1);
    assert!(view.completed.is_empty());
    assert!(view.unfinished[0].restorable);
  }

  #[test]
  fn todos_of_deleted_list_are_not_restorable() {
    let (revision, _) = fixture();
    let view = RevisionView::new(revision, None);
    assert!(view.restorable);
    assert!(!view.list_live);
    assert!(!view.unfinished[0].restorable);
  }
}
