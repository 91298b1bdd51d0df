//! SQLite backend for the relist store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each store operation runs as one
//! transaction on that thread.
//!
//! SQLite has no system-period versioning of its own; the schema installs
//! triggers that archive every version of a list or todo into a history table
//! (see [`schema`]). The restore engine only consumes that guarantee.

mod columns;
mod crud;
mod encode;
mod history;
mod restore;
mod store;

pub mod error;
pub mod executor;
pub mod schema;

pub use error::{Error, Result};
pub use store::SqliteStore;
