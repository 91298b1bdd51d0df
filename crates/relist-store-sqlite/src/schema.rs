//! SQL schema for the relist SQLite store, including system-period
//! versioning.
//!
//! Executed once at connection startup. Idempotent thanks to
//! `IF NOT EXISTS`; the layout version is recorded in `PRAGMA user_version`.
//!
//! # Versioning
//!
//! `todo_lists_history` and `todos_history` hold every version of every row,
//! the live one included (`sys_upper IS NULL`). Triggers on the live tables
//! keep them up to date:
//!
//! - insert opens a version `[now, NULL)`;
//! - update closes the open version at `now` and opens a new one;
//! - delete closes the open version at `now`.
//!
//! `now` is the transaction timestamp held in `tx_clock`, written by the
//! executor when a write transaction begins and cleared before it commits.
//! A version opened earlier in the same transaction is overwritten (update)
//! or dropped (delete) instead of being closed, so no interval is ever empty.
//! Writes without a transaction timestamp are rejected.
//!
//! Timestamps are fixed-width RFC 3339 strings with microsecond precision, so
//! text order is time order.

/// Schema layout version, stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- `now` is set for the duration of a write transaction only; `last` keeps
-- transaction timestamps strictly increasing.
CREATE TABLE IF NOT EXISTS tx_clock (
    id    INTEGER PRIMARY KEY CHECK (id = 1),
    now   TEXT,
    last  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS todo_lists (
    todo_list_id  TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS todos (
    todo_id       TEXT PRIMARY KEY,
    todo_list_id  TEXT NOT NULL REFERENCES todo_lists(todo_list_id) ON DELETE CASCADE,
    description   TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    completed     INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS todos_list_idx ON todos(todo_list_id);

-- History rows outlive their list, so there is no foreign key here.
CREATE TABLE IF NOT EXISTS todo_lists_history (
    history_id    TEXT PRIMARY KEY,
    todo_list_id  TEXT NOT NULL,
    name          TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    sys_lower     TEXT NOT NULL,
    sys_upper     TEXT,
    CHECK (sys_upper IS NULL OR sys_lower < sys_upper)
);

CREATE UNIQUE INDEX IF NOT EXISTS todo_lists_history_open_idx
    ON todo_lists_history(todo_list_id) WHERE sys_upper IS NULL;
CREATE INDEX IF NOT EXISTS todo_lists_history_list_idx
    ON todo_lists_history(todo_list_id, sys_lower);

CREATE TABLE IF NOT EXISTS todos_history (
    history_id    TEXT PRIMARY KEY,
    todo_id       TEXT NOT NULL,
    todo_list_id  TEXT NOT NULL,
    description   TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    completed     INTEGER NOT NULL,
    sys_lower     TEXT NOT NULL,
    sys_upper     TEXT,
    CHECK (sys_upper IS NULL OR sys_lower < sys_upper)
);

CREATE UNIQUE INDEX IF NOT EXISTS todos_history_open_idx
    ON todos_history(todo_id) WHERE sys_upper IS NULL;
CREATE INDEX IF NOT EXISTS todos_history_todo_idx
    ON todos_history(todo_id, sys_lower);
CREATE INDEX IF NOT EXISTS todos_history_list_idx
    ON todos_history(todo_list_id, sys_lower);

-- ── todo_lists versioning ───────────────────────────────────────────────────

CREATE TRIGGER IF NOT EXISTS todo_lists_version_insert
AFTER INSERT ON todo_lists
BEGIN
    SELECT RAISE(ABORT, 'versioned write outside a write transaction')
     WHERE (SELECT now FROM tx_clock WHERE id = 1) IS NULL;

    INSERT INTO todo_lists_history
        (history_id, todo_list_id, name, created_at, updated_at, sys_lower, sys_upper)
    SELECT lower(substr(r.h, 1, 8) || '-' || substr(r.h, 9, 4) || '-' ||
                 substr(r.h, 13, 4) || '-' || substr(r.h, 17, 4) || '-' ||
                 substr(r.h, 21)),
           NEW.todo_list_id, NEW.name, NEW.created_at, NEW.updated_at,
           (SELECT now FROM tx_clock WHERE id = 1), NULL
      FROM (SELECT hex(randomblob(16)) AS h) r;
END;

CREATE TRIGGER IF NOT EXISTS todo_lists_version_update
AFTER UPDATE ON todo_lists
BEGIN
    SELECT RAISE(ABORT, 'versioned write outside a write transaction')
     WHERE (SELECT now FROM tx_clock WHERE id = 1) IS NULL;

    UPDATE todo_lists_history
       SET name = NEW.name, created_at = NEW.created_at, updated_at = NEW.updated_at
     WHERE todo_list_id = OLD.todo_list_id
       AND sys_upper IS NULL
       AND sys_lower = (SELECT now FROM tx_clock WHERE id = 1);

    UPDATE todo_lists_history
       SET sys_upper = (SELECT now FROM tx_clock WHERE id = 1)
     WHERE todo_list_id = OLD.todo_list_id
       AND sys_upper IS NULL
       AND sys_lower < (SELECT now FROM tx_clock WHERE id = 1);

    INSERT INTO todo_lists_history
        (history_id, todo_list_id, name, created_at, updated_at, sys_lower, sys_upper)
    SELECT lower(substr(r.h, 1, 8) || '-' || substr(r.h, 9, 4) || '-' ||
                 substr(r.h, 13, 4) || '-' || substr(r.h, 17, 4) || '-' ||
                 substr(r.h, 21)),
           NEW.todo_list_id, NEW.name, NEW.created_at, NEW.updated_at,
           (SELECT now FROM tx_clock WHERE id = 1), NULL
      FROM (SELECT hex(randomblob(16)) AS h) r
     WHERE NOT EXISTS (SELECT 1 FROM todo_lists_history
                        WHERE todo_list_id = NEW.todo_list_id AND sys_upper IS NULL);
END;

CREATE TRIGGER IF NOT EXISTS todo_lists_version_delete
AFTER DELETE ON todo_lists
BEGIN
    SELECT RAISE(ABORT, 'versioned write outside a write transaction')
     WHERE (SELECT now FROM tx_clock WHERE id = 1) IS NULL;

    DELETE FROM todo_lists_history
     WHERE todo_list_id = OLD.todo_list_id
       AND sys_upper IS NULL
       AND sys_lower = (SELECT now FROM tx_clock WHERE id = 1);

    UPDATE todo_lists_history
       SET sys_upper = (SELECT now FROM tx_clock WHERE id = 1)
     WHERE todo_list_id = OLD.todo_list_id
       AND sys_upper IS NULL;
END;

-- ── todos versioning ────────────────────────────────────────────────────────

CREATE TRIGGER IF NOT EXISTS todos_version_insert
AFTER INSERT ON todos
BEGIN
    SELECT RAISE(ABORT, 'versioned write outside a write transaction')
     WHERE (SELECT now FROM tx_clock WHERE id = 1) IS NULL;

    INSERT INTO todos_history
        (history_id, todo_id, todo_list_id, description, created_at, completed,
         sys_lower, sys_upper)
    SELECT lower(substr(r.h, 1, 8) || '-' || substr(r.h, 9, 4) || '-' ||
                 substr(r.h, 13, 4) || '-' || substr(r.h, 17, 4) || '-' ||
                 substr(r.h, 21)),
           NEW.todo_id, NEW.todo_list_id, NEW.description, NEW.created_at,
           NEW.completed, (SELECT now FROM tx_clock WHERE id = 1), NULL
      FROM (SELECT hex(randomblob(16)) AS h) r;
END;

CREATE TRIGGER IF NOT EXISTS todos_version_update
AFTER UPDATE ON todos
BEGIN
    SELECT RAISE(ABORT, 'versioned write outside a write transaction')
     WHERE (SELECT now FROM tx_clock WHERE id = 1) IS NULL;

    UPDATE todos_history
       SET todo_list_id = NEW.todo_list_id, description = NEW.description,
           created_at = NEW.created_at, completed = NEW.completed
     WHERE todo_id = OLD.todo_id
       AND sys_upper IS NULL
       AND sys_lower = (SELECT now FROM tx_clock WHERE id = 1);

    UPDATE todos_history
       SET sys_upper = (SELECT now FROM tx_clock WHERE id = 1)
     WHERE todo_id = OLD.todo_id
       AND sys_upper IS NULL
       AND sys_lower < (SELECT now FROM tx_clock WHERE id = 1);

    INSERT INTO todos_history
        (history_id, todo_id, todo_list_id, description, created_at, completed,
         sys_lower, sys_upper)
    SELECT lower(substr(r.h, 1, 8) || '-' || substr(r.h, 9, 4) || '-' ||
                 substr(r.h, 13, 4) || '-' || substr(r.h, 17, 4) || '-' ||
                 substr(r.h, 21)),
           NEW.todo_id, NEW.todo_list_id, NEW.description, NEW.created_at,
           NEW.completed, (SELECT now FROM tx_clock WHERE id = 1), NULL
      FROM (SELECT hex(randomblob(16)) AS h) r
     WHERE NOT EXISTS (SELECT 1 FROM todos_history
                        WHERE todo_id = NEW.todo_id AND sys_upper IS NULL);
END;

CREATE TRIGGER IF NOT EXISTS todos_version_delete
AFTER DELETE ON todos
BEGIN
    SELECT RAISE(ABORT, 'versioned write outside a write transaction')
     WHERE (SELECT now FROM tx_clock WHERE id = 1) IS NULL;

    DELETE FROM todos_history
     WHERE todo_id = OLD.todo_id
       AND sys_upper IS NULL
       AND sys_lower = (SELECT now FROM tx_clock WHERE id = 1);

    UPDATE todos_history
       SET sys_upper = (SELECT now FROM tx_clock WHERE id = 1)
     WHERE todo_id = OLD.todo_id
       AND sys_upper IS NULL;
END;

PRAGMA user_version = 1;
";
