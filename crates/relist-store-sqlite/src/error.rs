//! Error type for `relist-store-sqlite`.

use relist_core::store::{ErrorKind, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] relist_core::Error),

  /// A lookup returned no rows, or a targeted mutation affected none.
  #[error("not found: {0}")]
  NotFound(String),

  /// A statement meant to touch one row touched several.
  #[error("statement affected {affected} rows, but should only affect one")]
  IntegrityViolation { affected: usize },

  /// Binding, statement or constraint failure reported by SQLite.
  #[error("query error: {0}")]
  Query(#[from] rusqlite::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Error {
  pub(crate) fn not_found(what: impl std::fmt::Display) -> Self {
    Self::NotFound(what.to_string())
  }

  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }
}

impl StoreError for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::NotFound(_) => ErrorKind::NotFound,
      Self::IntegrityViolation { .. } => ErrorKind::IntegrityViolation,
      Self::Core(relist_core::Error::InvalidInput(_)) => ErrorKind::InvalidInput,
      Self::Query(_) | Self::Database(_) | Self::Uuid(_) | Self::DateParse(_) => {
        ErrorKind::Query
      }
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
