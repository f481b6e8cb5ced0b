//! Error types for `quill-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("voters filter must be {expected} bytes, got {actual}")]
  InvalidFilterLength { expected: usize, actual: usize },

  #[error("unknown comment mode: {0}")]
  UnknownMode(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
