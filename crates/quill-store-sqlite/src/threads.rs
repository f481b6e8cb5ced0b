//! Thread persistence over the `threads` table.

use quill_core::thread::Thread;
use rusqlite::types::Value;

use crate::{Error, Gateway, Result, Row, schema};

const INSERT: &str = "INSERT INTO threads (uri, title) VALUES (?1, ?2)";

/// Thread lookups and creation. Removal happens implicitly through the
/// stale-thread trigger once the last comment is gone.
#[derive(Debug, Clone)]
pub struct Threads {
  gateway: Gateway,
}

impl Threads {
  /// Create the `threads` table if needed.
  pub(crate) async fn new(gateway: Gateway) -> Result<Self> {
    gateway.execute(schema::THREADS, []).await?;
    Ok(Self { gateway })
  }

  pub async fn create(&self, uri: &str, title: Option<&str>) -> Result<Thread> {
    let title = title.map(str::to_owned);
    let rs = self
      .gateway
      .execute(INSERT, [Value::from(uri.to_owned()), Value::from(title.clone())])
      .await?;

    if rs.changes() == 0 {
      return Err(Error::MissingRow(INSERT));
    }

    Ok(Thread { id: rs.last_insert_rowid(), uri: uri.to_owned(), title })
  }

  pub async fn get(&self, id: i64) -> Result<Option<Thread>> {
    let rs = self
      .gateway
      .execute("SELECT id, uri, title FROM threads WHERE id = ?1", [Value::from(id)])
      .await?;
    rs.fetch_one().map(decode).transpose()
  }

  pub async fn get_by_uri(&self, uri: &str) -> Result<Option<Thread>> {
    let rs = self
      .gateway
      .execute(
        "SELECT id, uri, title FROM threads WHERE uri = ?1",
        [Value::from(uri.to_owned())],
      )
      .await?;
    rs.fetch_one().map(decode).transpose()
  }

  pub async fn contains(&self, uri: &str) -> Result<bool> {
    Ok(self.get_by_uri(uri).await?.is_some())
  }
}

fn decode(row: &Row) -> Result<Thread> {
  Ok(Thread {
    id:    row.get(0)?,
    uri:   row.get(1)?,
    title: row.get(2)?,
  })
}
