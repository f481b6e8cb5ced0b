//! Comment and the input type used to create one.

use serde::Serialize;

use crate::{Bloomfilter, Error, Result};

/// Moderation state of a comment, stored as a small integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
  Accepted,
  Pending,
  Deleted,
}

impl Mode {
  pub fn as_i64(self) -> i64 {
    match self {
      Mode::Accepted => 1,
      Mode::Pending => 2,
      Mode::Deleted => 4,
    }
  }

  pub fn from_i64(value: i64) -> Result<Self> {
    match value {
      1 => Ok(Mode::Accepted),
      2 => Ok(Mode::Pending),
      4 => Ok(Mode::Deleted),
      other => Err(Error::UnknownMode(other)),
    }
  }
}

/// A stored comment.
///
/// Timestamps are seconds since the Unix epoch with sub-second precision,
/// matching the `FLOAT` columns they are read from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
  pub id:          i64,
  pub tid:         i64,
  pub parent:      Option<i64>,
  pub created:     f64,
  pub modified:    Option<f64>,
  pub mode:        Mode,
  pub remote_addr: String,
  pub text:        String,
  pub author:      Option<String>,
  pub email:       Option<String>,
  pub website:     Option<String>,
  pub likes:       i64,
  pub dislikes:    i64,
  #[serde(skip)]
  pub voters:      Bloomfilter,
}

/// The caller-supplied fields of a comment; ids and timestamps are assigned
/// by the store.
#[derive(Debug, Clone)]
pub struct NewComment {
  pub parent:      Option<i64>,
  pub mode:        Mode,
  pub remote_addr: String,
  pub text:        String,
  pub author:      Option<String>,
  pub email:       Option<String>,
  pub website:     Option<String>,
}

impl NewComment {
  /// An accepted top-level comment with no author details.
  pub fn new(remote_addr: impl Into<String>, text: impl Into<String>) -> Self {
    Self {
      parent:      None,
      mode:        Mode::Accepted,
      remote_addr: remote_addr.into(),
      text:        text.into(),
      author:      None,
      email:       None,
      website:     None,
    }
  }

  pub fn with_parent(mut self, parent: i64) -> Self {
    self.parent = Some(parent);
    self
  }

  pub fn with_author(mut self, author: impl Into<String>) -> Self {
    self.author = Some(author.into());
    self
  }

  pub fn with_mode(mut self, mode: Mode) -> Self {
    self.mode = mode;
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mode_round_trips_through_column_values() {
    for mode in [Mode::Accepted, Mode::Pending, Mode::Deleted] {
      assert_eq!(Mode::from_i64(mode.as_i64()).unwrap(), mode);
    }
  }

  #[test]
  fn unknown_mode_is_rejected() {
    assert!(matches!(Mode::from_i64(3), Err(Error::UnknownMode(3))));
  }
}
