//! Error type for `divvy-store-sqlite`.

use divvy_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("amount parse error: {0}")]
  AmountParse(String),
}

impl StoreError for Error {
  /// True when the underlying SQLite failure is a UNIQUE-constraint
  /// violation — a duplicate ticker or username hitting its unique index.
  fn is_unique_violation(&self) -> bool {
    let Error::Database(tokio_rusqlite::Error::Rusqlite(e)) = self else {
      return false;
    };
    matches!(
      e,
      rusqlite::Error::SqliteFailure(f, _)
        if f.code == rusqlite::ErrorCode::ConstraintViolation
          && f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
