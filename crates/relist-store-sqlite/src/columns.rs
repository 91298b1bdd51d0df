//! Column descriptors for each relation.
//!
//! The order of each descriptor matches the field order read by the raw row
//! types in [`crate::encode`].

/// The projectable columns of one relation.
#[derive(Debug, Clone, Copy)]
pub struct Columns(&'static [&'static str]);

impl Columns {
  pub const fn new(columns: &'static [&'static str]) -> Self { Self(columns) }

  /// `a, b, c`
  pub fn joined(&self) -> String { self.0.join(", ") }

  /// `t.a, t.b, t.c`
  pub fn on_alias(&self, alias: &str) -> String {
    self
      .0
      .iter()
      .map(|c| format!("{alias}.{c}"))
      .collect::<Vec<_>>()
      .join(", ")
  }

  /// `:a, :b, :c`, one named parameter per column.
  pub fn placeholders(&self) -> String {
    self.0.iter().map(|c| format!(":{c}")).collect::<Vec<_>>().join(", ")
  }
}

pub const LIST_COLUMNS: Columns =
  Columns::new(&["todo_list_id", "name", "created_at", "updated_at"]);

pub const TODO_COLUMNS: Columns = Columns::new(&[
  "todo_id",
  "todo_list_id",
  "description",
  "created_at",
  "completed",
]);

/// Revision identity and interval, prefixed to every history projection.
pub const REVISION_COLUMNS: Columns =
  Columns::new(&["history_id", "sys_lower", "sys_upper"]);
