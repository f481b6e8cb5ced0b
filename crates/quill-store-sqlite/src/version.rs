//! Schema version stored in the SQLite header (`PRAGMA user_version`).
//!
//! The value lives outside every table and survives table drops. It is the
//! single input to migration decisions.

use rusqlite::Connection;

use crate::{Error, Gateway, Result};

const READ: &str = "PRAGMA user_version";

/// Stamp `version` on an open connection, inside whatever transaction the
/// caller has begun.
pub(crate) fn write(conn: &Connection, version: u32) -> rusqlite::Result<()> {
  conn.execute_batch(&stamp(version))
}

/// Pragmas cannot take bound parameters, so the integer is formatted in.
fn stamp(version: u32) -> String { format!("PRAGMA user_version = {version}") }

fn decode(raw: i64) -> Result<u32> {
  u32::try_from(raw).map_err(|_| Error::InvalidVersion(raw))
}

fn check_range(version: u32) -> Result<()> {
  if i32::try_from(version).is_err() {
    return Err(Error::VersionOutOfRange(version));
  }
  Ok(())
}

impl Gateway {
  /// Current schema version; `0` for a store that was never stamped.
  pub async fn version(&self) -> Result<u32> {
    let rs = self.execute(READ, []).await?;
    let row = rs.fetch_one().ok_or(Error::MissingRow(READ))?;
    decode(row.get(0)?)
  }

  pub async fn set_version(&self, version: u32) -> Result<()> {
    check_range(version)?;
    self.execute(stamp(version), []).await?;
    Ok(())
  }
}
