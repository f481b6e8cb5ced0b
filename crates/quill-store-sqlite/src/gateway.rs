//! [`Gateway`] — the only path by which anything touches the store file.
//!
//! Each call opens its own connection, runs inside a transaction, commits and
//! closes. Nothing is held between calls, so there is no shared connection
//! state to guard. Results are materialised before the connection closes.

use std::path::{Path, PathBuf};

use rusqlite::types::{FromSql, Value, ValueRef};

use crate::{Error, Result};

// ─── Statement text ──────────────────────────────────────────────────────────

/// A single SQL statement, built from a string or from ordered fragments
/// joined with one space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sql(String);

impl Sql {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for Sql {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl From<String> for Sql {
  fn from(s: String) -> Self { Self(s) }
}

impl From<&[&str]> for Sql {
  fn from(fragments: &[&str]) -> Self { Self(fragments.join(" ")) }
}

impl<const N: usize> From<[&str; N]> for Sql {
  fn from(fragments: [&str; N]) -> Self { Self(fragments.join(" ")) }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// One result row, cloned out of the connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Row(Vec<Value>);

impl Row {
  /// Convert the value at `idx` to `T`.
  pub fn get<T: FromSql>(&self, idx: usize) -> Result<T> {
    let value = self.0.get(idx).ok_or(Error::ColumnIndex(idx))?;
    Ok(T::column_result(ValueRef::from(value))?)
  }
}

/// The materialised outcome of [`Gateway::execute`].
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
  columns:           Vec<String>,
  rows:              Vec<Row>,
  changes:           u64,
  last_insert_rowid: i64,
}

impl ResultSet {
  pub fn fetch_one(&self) -> Option<&Row> { self.rows.first() }

  pub fn fetch_all(&self) -> &[Row] { &self.rows }

  pub fn columns(&self) -> &[String] { &self.columns }

  /// Rows modified by the statement itself; trigger side effects are not
  /// counted.
  pub fn changes(&self) -> u64 { self.changes }

  pub fn last_insert_rowid(&self) -> i64 { self.last_insert_rowid }
}

// ─── Gateway ─────────────────────────────────────────────────────────────────

/// Opens a connection to the store file per operation.
///
/// Cloning is cheap: the gateway holds only the path.
#[derive(Debug, Clone)]
pub struct Gateway {
  path: PathBuf,
}

impl Gateway {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path { &self.path }

  /// Run one statement with positional parameters and commit it.
  pub async fn execute<S, P>(&self, sql: S, params: P) -> Result<ResultSet>
  where
    S: Into<Sql>,
    P: IntoIterator<Item = Value>,
  {
    let sql = sql.into();
    let params: Vec<Value> = params.into_iter().collect();
    self
      .with_connection(move |conn| run_statement(conn, &sql, &params))
      .await
  }

  /// Open a connection, hand it to `f`, then close it.
  ///
  /// Used for units of work that span several statements; `f` is responsible
  /// for its own transaction.
  pub(crate) async fn with_connection<F, R>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
  {
    let conn = tokio_rusqlite::Connection::open(&self.path).await?;
    let outcome = conn.call(move |raw| Ok(f(raw)?)).await;
    let closed = conn.close().await;
    let value = outcome?;
    closed?;
    Ok(value)
  }
}

fn run_statement(
  conn:   &mut rusqlite::Connection,
  sql:    &Sql,
  params: &[Value],
) -> rusqlite::Result<ResultSet> {
  let tx = conn.transaction()?;

  let result = {
    let mut stmt = tx.prepare(sql.as_str())?;
    let columns: Vec<String> = stmt
      .column_names()
      .into_iter()
      .map(str::to_owned)
      .collect();
    let width = stmt.column_count();

    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;
    let mut collected = Vec::new();
    while let Some(row) = rows.next()? {
      let values = (0..width)
        .map(|i| row.get::<_, Value>(i))
        .collect::<rusqlite::Result<Vec<_>>>()?;
      collected.push(Row(values));
    }

    ResultSet {
      columns,
      rows: collected,
      changes: tx.changes() as u64,
      last_insert_rowid: tx.last_insert_rowid(),
    }
  };

  tx.commit()?;
  Ok(result)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fragments_join_with_single_space() {
    let sql = Sql::from(["SELECT name", "FROM sqlite_master", "WHERE type='table'"]);
    assert_eq!(sql.as_str(), "SELECT name FROM sqlite_master WHERE type='table'");
  }

  #[test]
  fn plain_statement_is_kept_verbatim() {
    let sql = Sql::from("PRAGMA user_version");
    assert_eq!(sql.as_str(), "PRAGMA user_version");
  }

  #[test]
  fn row_get_reports_missing_column() {
    let row = Row(vec![Value::Integer(7)]);
    assert_eq!(row.get::<i64>(0).unwrap(), 7);
    assert!(matches!(row.get::<i64>(1), Err(Error::ColumnIndex(1))));
  }

  #[test]
  fn row_get_reports_type_mismatch() {
    let row = Row(vec![Value::Text("seven".into())]);
    assert!(matches!(row.get::<i64>(0), Err(Error::Decode(_))));
  }
}
