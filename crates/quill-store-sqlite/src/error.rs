//! Error type for `quill-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] quill_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("column decode error: {0}")]
  Decode(#[from] rusqlite::types::FromSqlError),

  /// The catalog query deciding between fresh and existing stores failed.
  #[error("failed to inspect store catalog")]
  Catalog(#[source] Box<Error>),

  /// A migration step failed; the version was left at `from`.
  #[error("migration from version {from} to {to} failed")]
  Migration {
    from:   u32,
    to:     u32,
    #[source]
    source: Box<Error>,
  },

  #[error("no migration path to schema version {0}")]
  UnknownVersion(u32),

  #[error("schema version {0} does not fit in the store header")]
  VersionOutOfRange(u32),

  #[error("store reports invalid schema version {0}")]
  InvalidVersion(i64),

  #[error("no column at index {0}")]
  ColumnIndex(usize),

  #[error("statement returned no rows: {0}")]
  MissingRow(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
