//! SQL definitions for the Quill SQLite store.
//!
//! Table DDL is executed by the collaborator that owns the table, after the
//! schema version has been settled. Everything here is idempotent.

/// Catalog probe deciding whether the store already holds data.
pub const CORE_TABLES: &[&str] = &[
  "SELECT name FROM sqlite_master",
  "WHERE type = 'table' AND name IN ('threads', 'comments')",
];

pub const THREADS: &str = "
CREATE TABLE IF NOT EXISTS threads (
    id     INTEGER PRIMARY KEY,
    uri    VARCHAR(256) UNIQUE,
    title  VARCHAR(256)
)";

// `voters` is a fixed 256-byte filter; see `quill_core::bloom`.
pub const COMMENTS: &str = "
CREATE TABLE IF NOT EXISTS comments (
    tid          REFERENCES threads(id),
    id           INTEGER PRIMARY KEY,
    parent       INTEGER,
    created      FLOAT NOT NULL,
    modified     FLOAT,
    mode         INTEGER,   -- 1 accepted | 2 pending | 4 deleted
    remote_addr  VARCHAR,
    text         VARCHAR,
    author       VARCHAR,
    email        VARCHAR,
    website      VARCHAR,
    likes        INTEGER DEFAULT 0,
    dislikes     INTEGER DEFAULT 0,
    voters       BLOB NOT NULL
)";

/// Deleting the last comment of a thread deletes the thread.
pub const REMOVE_STALE_THREADS: &[&str] = &[
  "CREATE TRIGGER IF NOT EXISTS remove_stale_threads",
  "AFTER DELETE ON comments",
  "BEGIN",
  "    DELETE FROM threads WHERE id NOT IN (SELECT tid FROM comments);",
  "END",
];
