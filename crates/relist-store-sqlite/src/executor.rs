//! Transactional query executor.
//!
//! Every store operation runs inside exactly one [`Tx`], obtained through
//! [`run_in_tx`]. Statements take named parameters built with [`Params`].
//! Either every statement of the operation commits or none does.
//!
//! A [`Tx`] borrows the connection, so it cannot outlive the operation that
//! opened it or be moved to another thread.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{
  Connection, OptionalExtension as _, Row, ToSql, Transaction, TransactionBehavior,
  types::Value,
};
use tracing::{debug, warn};

use crate::{
  Error, Result,
  encode::{Bind, decode_dt, encode_dt, to_storage_precision},
};

// ─── Parameters ──────────────────────────────────────────────────────────────

/// Named parameters for one statement.
///
/// Names include their sigil, e.g. `":list_id"`. Binding a name the statement
/// does not declare fails with [`Error::Query`].
#[derive(Debug, Default, Clone)]
pub struct Params {
  values: Vec<(&'static str, Value)>,
}

impl Params {
  pub fn new() -> Self { Self::default() }

  pub fn bind(mut self, name: &'static str, value: impl Bind) -> Self {
    self.values.push((name, value.to_sql_value()));
    self
  }

  fn as_named(&self) -> Vec<(&str, &dyn ToSql)> {
    self
      .values
      .iter()
      .map(|(name, value)| (*name, value as &dyn ToSql))
      .collect()
  }
}

// ─── Transactions ────────────────────────────────────────────────────────────

/// What a transaction is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
  /// Deferred transaction; no transaction timestamp is published, so any
  /// versioned write is rejected by the schema.
  Read,
  /// Takes the write lock up front and publishes the transaction timestamp
  /// the versioning triggers stamp history rows with.
  Write,
}

/// One open transaction.
pub struct Tx<'conn> {
  inner: Transaction<'conn>,
  now:   DateTime<Utc>,
}

impl Tx<'_> {
  /// The transaction timestamp. Constant for the whole transaction; in write
  /// transactions it is strictly later than any earlier write transaction's.
  pub fn now(&self) -> DateTime<Utc> { self.now }

  /// Run a statement and return the number of rows it changed directly
  /// (rows changed by triggers are not counted).
  pub fn execute(&self, sql: &str, params: &Params) -> Result<usize> {
    let mut stmt = self.inner.prepare_cached(sql)?;
    Ok(stmt.execute(params.as_named().as_slice())?)
  }

  /// Run a query and map its first row, if any.
  pub fn fetch_optional<T, F>(&self, sql: &str, params: &Params, map: F) -> Result<Option<T>>
  where
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
  {
    let mut stmt = self.inner.prepare_cached(sql)?;
    Ok(stmt.query_row(params.as_named().as_slice(), map).optional()?)
  }

  /// Run a query and map its first row. An empty result is
  /// [`Error::NotFound`] naming `what`.
  pub fn fetch_one<T, F>(
    &self,
    sql: &str,
    params: &Params,
    what: impl std::fmt::Display,
    map: F,
  ) -> Result<T>
  where
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
  {
    self
      .fetch_optional(sql, params, map)?
      .ok_or_else(|| Error::not_found(what))
  }

  /// Run a query and map every row.
  pub fn fetch_many<T, F>(&self, sql: &str, params: &Params, map: F) -> Result<Vec<T>>
  where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
  {
    let mut stmt = self.inner.prepare_cached(sql)?;
    let rows = stmt
      .query_map(params.as_named().as_slice(), map)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
  }

  /// Run a statement that must change exactly one row.
  ///
  /// Zero rows is [`Error::NotFound`], so a missing update or delete target
  /// reads the same as a failed lookup. More than one row is
  /// [`Error::IntegrityViolation`].
  pub fn mutate_exactly_one(&self, sql: &str, params: &Params) -> Result<()> {
    match self.execute(sql, params)? {
      0 => Err(Error::not_found("statement affected no rows")),
      1 => Ok(()),
      affected => Err(Error::IntegrityViolation { affected }),
    }
  }
}

/// Run `f` inside one transaction on `conn`.
///
/// Commits when `f` returns `Ok`, rolls back when it returns `Err`. If `f`
/// panics, the transaction is rolled back as it is dropped during unwinding.
pub fn run_in_tx<T, F>(conn: &mut Connection, mode: TxMode, f: F) -> Result<T>
where
  F: FnOnce(&Tx<'_>) -> Result<T>,
{
  let behavior = match mode {
    TxMode::Read => TransactionBehavior::Deferred,
    TxMode::Write => TransactionBehavior::Immediate,
  };
  let inner = conn.transaction_with_behavior(behavior)?;
  let now = match mode {
    TxMode::Read => to_storage_precision(Utc::now()),
    TxMode::Write => start_clock(&inner)?,
  };
  let tx = Tx { inner, now };

  match f(&tx) {
    Ok(value) => {
      if mode == TxMode::Write {
        tx.inner.execute("UPDATE tx_clock SET now = NULL WHERE id = 1", [])?;
      }
      tx.inner.commit()?;
      Ok(value)
    }
    Err(err) => {
      match tx.inner.rollback() {
        Ok(()) => debug!(error = %err, "transaction rolled back"),
        Err(rollback_err) => {
          warn!(error = %err, %rollback_err, "failed to roll back transaction after error")
        }
      }
      Err(err)
    }
  }
}

/// Publish a fresh transaction timestamp, strictly after the previous one.
fn start_clock(tx: &Transaction<'_>) -> Result<DateTime<Utc>> {
  let last: Option<String> = tx
    .query_row("SELECT last FROM tx_clock WHERE id = 1", [], |r| r.get(0))
    .optional()?;

  let mut now = to_storage_precision(Utc::now());
  if let Some(last) = last.as_deref().map(decode_dt).transpose()?
    && now <= last
  {
    now = last + Duration::microseconds(1);
  }

  tx.execute(
    "INSERT INTO tx_clock (id, now, last) VALUES (1, ?1, ?1)
     ON CONFLICT(id) DO UPDATE SET now = excluded.now, last = excluded.last",
    [encode_dt(now)],
  )?;
  Ok(now)
}

#[cfg(test)]
mod tests {
  use std::panic::{AssertUnwindSafe, catch_unwind};

  use relist_core::id::ListId;

  use super::*;
  use crate::schema::{SCHEMA, SCHEMA_VERSION};

  const INSERT_LIST: &str = "INSERT INTO todo_lists (todo_list_id, name, created_at, updated_at)
                             VALUES (:id, :name, :now, :now)";

  fn conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn
  }

  fn insert_list(tx: &Tx<'_>, id: ListId, name: &str) -> Result<()> {
    tx.mutate_exactly_one(
      INSERT_LIST,
      &Params::new().bind(":id", id).bind(":name", name).bind(":now", tx.now()),
    )
  }

  fn count_lists(conn: &Connection) -> i64 {
    conn
      .query_row("SELECT COUNT(*) FROM todo_lists", [], |r| r.get(0))
      .unwrap()
  }

  #[test]
  fn schema_records_its_version() {
    let conn = conn();
    let version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0)).unwrap();
    assert_eq!(version, SCHEMA_VERSION);
  }

  #[test]
  fn commit_persists_writes() {
    let mut conn = conn();
    run_in_tx(&mut conn, TxMode::Write, |tx| insert_list(tx, ListId::new(), "a")).unwrap();
    assert_eq!(count_lists(&conn), 1);
  }

  #[test]
  fn mutate_exactly_one_reports_missing_target() {
    let mut conn = conn();
    let err = run_in_tx(&mut conn, TxMode::Write, |tx| {
      tx.mutate_exactly_one(
        "DELETE FROM todo_lists WHERE todo_list_id = :id",
        &Params::new().bind(":id", ListId::new()),
      )
    })
    .unwrap_err();
    assert!(err.is_not_found(), "{err}");
  }

  #[test]
  fn mutate_exactly_one_rejects_multi_row_changes_and_rolls_back() {
    let mut conn = conn();
    run_in_tx(&mut conn, TxMode::Write, |tx| {
      insert_list(tx, ListId::new(), "dup")?;
      insert_list(tx, ListId::new(), "dup")
    })
    .unwrap();

    let err = run_in_tx(&mut conn, TxMode::Write, |tx| {
      tx.mutate_exactly_one(
        "UPDATE todo_lists SET name = :name WHERE name = :old",
        &Params::new().bind(":name", "renamed").bind(":old", "dup"),
      )
    })
    .unwrap_err();
    assert!(matches!(err, Error::IntegrityViolation { affected: 2 }), "{err}");

    let renamed: i64 = conn
      .query_row("SELECT COUNT(*) FROM todo_lists WHERE name = 'renamed'", [], |r| r.get(0))
      .unwrap();
    assert_eq!(renamed, 0);
  }

  #[test]
  fn error_rolls_back_earlier_statements() {
    let mut conn = conn();
    let result: Result<()> = run_in_tx(&mut conn, TxMode::Write, |tx| {
      insert_list(tx, ListId::new(), "doomed")?;
      Err(Error::not_found("later step"))
    });
    assert!(result.is_err());
    assert_eq!(count_lists(&conn), 0);
  }

  #[test]
  fn panic_rolls_back() {
    let mut conn = conn();
    let outcome = catch_unwind(AssertUnwindSafe(|| {
      run_in_tx(&mut conn, TxMode::Write, |tx| -> Result<()> {
        insert_list(tx, ListId::new(), "doomed")?;
        panic!("boom");
      })
    }));
    assert!(outcome.is_err());
    assert_eq!(count_lists(&conn), 0);
  }

  #[test]
  fn fetch_one_on_empty_result_is_not_found() {
    let mut conn = conn();
    let err = run_in_tx(&mut conn, TxMode::Read, |tx| {
      tx.fetch_one(
        "SELECT name FROM todo_lists WHERE todo_list_id = :id",
        &Params::new().bind(":id", ListId::new()),
        "todo list",
        |r| r.get::<_, String>(0),
      )
    })
    .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "not found: todo list");
  }

  #[test]
  fn fetch_many_maps_every_row() {
    let mut conn = conn();
    run_in_tx(&mut conn, TxMode::Write, |tx| {
      insert_list(tx, ListId::new(), "b")?;
      insert_list(tx, ListId::new(), "a")
    })
    .unwrap();

    let names = run_in_tx(&mut conn, TxMode::Read, |tx| {
      tx.fetch_many("SELECT name FROM todo_lists ORDER BY name", &Params::new(), |r| {
        r.get::<_, String>(0)
      })
    })
    .unwrap();
    assert_eq!(names, ["a", "b"]);
  }

  #[test]
  fn unknown_parameter_is_a_query_error() {
    let mut conn = conn();
    let err = run_in_tx(&mut conn, TxMode::Read, |tx| {
      tx.execute("SELECT 1", &Params::new().bind(":nope", true))
    })
    .unwrap_err();
    assert!(matches!(err, Error::Query(_)), "{err}");
  }

  #[test]
  fn versioned_write_outside_write_transaction_is_rejected() {
    let mut conn = conn();
    let err = run_in_tx(&mut conn, TxMode::Read, |tx| insert_list(tx, ListId::new(), "x"))
      .unwrap_err();
    assert!(matches!(err, Error::Query(_)), "{err}");

    // Raw writes after a committed transaction are rejected too.
    run_in_tx(&mut conn, TxMode::Write, |tx| insert_list(tx, ListId::new(), "ok")).unwrap();
    let raw = conn.execute(
      "UPDATE todo_lists SET name = 'sneaky'",
      [],
    );
    assert!(raw.is_err());
  }

  #[test]
  fn write_timestamps_strictly_increase() {
    let mut conn = conn();
    let mut previous = None;
    for _ in 0..20 {
      let now = run_in_tx(&mut conn, TxMode::Write, |tx| Ok(tx.now())).unwrap();
      if let Some(previous) = previous {
        assert!(now > previous);
      }
      previous = Some(now);
    }
  }
}
