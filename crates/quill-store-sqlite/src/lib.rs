//! SQLite backend for the Quill comment store.
//!
//! Owns the on-disk schema: bootstraps fresh stores, steps existing ones
//! through the versioned migrations, and installs the trigger that removes
//! threads once their last comment is deleted. Every statement runs on its
//! own short-lived [`tokio_rusqlite`] connection.

mod comments;
mod config;
mod gateway;
mod migrate;
mod schema;
mod store;
mod threads;
mod version;

pub mod error;

pub use comments::Comments;
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use gateway::{Gateway, ResultSet, Row, Sql};
pub use migrate::{MAX_VERSION, StepReport};
pub use rusqlite::types::Value;
pub use store::{Bootstrap, SqliteStore};
pub use threads::Threads;
