//! [`Comments`] — owner of the `comments` table.

use chrono::Utc;
use quill_core::{
  Bloomfilter,
  comment::{Comment, Mode, NewComment},
};
use rusqlite::types::Value;

use crate::{Error, Gateway, Result, Row, schema};

const SELECT: &str = "SELECT id, tid, parent, created, modified, mode, remote_addr, text,
                             author, email, website, likes, dislikes, voters
                      FROM comments";

const INSERT: &str = "INSERT INTO comments (
                        tid, parent, created, modified, mode, remote_addr, text,
                        author, email, website, voters
                      ) VALUES (?1, ?2, ?3, NULL, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

#[derive(Debug, Clone)]
pub struct Comments {
  gateway: Gateway,
}

impl Comments {
  /// Create the `comments` table if needed.
  pub(crate) async fn new(gateway: Gateway) -> Result<Self> {
    gateway.execute(schema::COMMENTS, []).await?;
    Ok(Self { gateway })
  }

  /// Insert a comment under thread `tid`.
  ///
  /// The author's own address seeds the voters filter so they cannot vote on
  /// their own comment.
  pub async fn add(&self, tid: i64, input: NewComment) -> Result<Comment> {
    let created = now();
    let voters: Bloomfilter = [input.remote_addr.as_str()].into_iter().collect();

    let rs = self
      .gateway
      .execute(
        INSERT,
        [
          Value::from(tid),
          Value::from(input.parent),
          Value::from(created),
          Value::from(input.mode.as_i64()),
          Value::from(input.remote_addr.clone()),
          Value::from(input.text.clone()),
          Value::from(input.author.clone()),
          Value::from(input.email.clone()),
          Value::from(input.website.clone()),
          Value::from(voters.as_bytes().to_vec()),
        ],
      )
      .await?;

    if rs.changes() == 0 {
      return Err(Error::MissingRow(INSERT));
    }

    Ok(Comment {
      id: rs.last_insert_rowid(),
      tid,
      parent: input.parent,
      created,
      modified: None,
      mode: input.mode,
      remote_addr: input.remote_addr,
      text: input.text,
      author: input.author,
      email: input.email,
      website: input.website,
      likes: 0,
      dislikes: 0,
      voters,
    })
  }

  pub async fn get(&self, id: i64) -> Result<Option<Comment>> {
    let rs = self
      .gateway
      .execute(format!("{SELECT} WHERE id = ?1"), [Value::from(id)])
      .await?;
    rs.fetch_one().map(decode).transpose()
  }

  /// Number of comments attached to thread `tid`, in any mode.
  pub async fn count(&self, tid: i64) -> Result<u64> {
    let rs = self
      .gateway
      .execute("SELECT COUNT(*) FROM comments WHERE tid = ?1", [Value::from(tid)])
      .await?;
    let row = rs.fetch_one().ok_or(Error::MissingRow("SELECT COUNT(*)"))?;
    Ok(row.get::<i64>(0)?.max(0) as u64)
  }

  /// Remove the row outright. Returns `false` if no such comment exists.
  ///
  /// If this was the thread's last comment the stale-thread trigger removes
  /// the thread in the same statement.
  pub async fn delete(&self, id: i64) -> Result<bool> {
    let rs = self
      .gateway
      .execute("DELETE FROM comments WHERE id = ?1", [Value::from(id)])
      .await?;
    Ok(rs.changes() > 0)
  }
}

/// Seconds since the epoch, as stored in the `FLOAT` timestamp columns.
fn now() -> f64 {
  Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

fn decode(row: &Row) -> Result<Comment> {
  let voters: Vec<u8> = row.get(13)?;
  Ok(Comment {
    id:          row.get(0)?,
    tid:         row.get(1)?,
    parent:      row.get(2)?,
    created:     row.get(3)?,
    modified:    row.get(4)?,
    mode:        Mode::from_i64(row.get(5)?)?,
    remote_addr: row.get::<Option<String>>(6)?.unwrap_or_default(),
    text:        row.get::<Option<String>>(7)?.unwrap_or_default(),
    author:      row.get(8)?,
    email:       row.get(9)?,
    website:     row.get(10)?,
    likes:       row.get::<Option<i64>>(11)?.unwrap_or(0),
    dislikes:    row.get::<Option<i64>>(12)?.unwrap_or(0),
    voters:      Bloomfilter::from_bytes(&voters)?,
  })
}
