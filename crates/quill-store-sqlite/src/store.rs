//! [`SqliteStore`] — opens a store file and brings its schema up to date.

use std::path::{Path, PathBuf};

use rusqlite::types::Value;
use tracing::debug;

use crate::{
  Comments, Error, Gateway, ResultSet, Result, Sql, StoreConfig, Threads,
  migrate::{self, MAX_VERSION, StepReport},
  schema,
};

/// How [`SqliteStore::open`] found the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bootstrap {
  /// No core tables existed; the version was stamped without migrating.
  Fresh,
  /// Core tables existed; holds the steps that ran (possibly none).
  Existing(Vec<StepReport>),
}

/// A Quill comment store backed by a single SQLite file.
///
/// The handle holds no connection. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct SqliteStore {
  gateway:   Gateway,
  config:    StoreConfig,
  bootstrap: Bootstrap,
  threads:   Threads,
  comments:  Comments,
}

impl SqliteStore {
  /// Open (or create) the store at `path`.
  ///
  /// Settles the schema version before the thread and comment tables are
  /// touched, then installs the stale-thread trigger. Any failure along the
  /// way fails the open.
  pub async fn open(path: impl AsRef<Path>, config: StoreConfig) -> Result<Self> {
    let gateway = Gateway::new(expand_tilde(path.as_ref()));

    let bootstrap = if has_core_tables(&gateway)
      .await
      .map_err(|e| Error::Catalog(Box::new(e)))?
    {
      Bootstrap::Existing(migrate::migrate(&gateway, &config, MAX_VERSION).await?)
    } else {
      gateway.set_version(MAX_VERSION).await?;
      debug!(path = ?gateway.path(), version = MAX_VERSION, "initialised fresh store");
      Bootstrap::Fresh
    };

    let threads = Threads::new(gateway.clone()).await?;
    let comments = Comments::new(gateway.clone()).await?;

    gateway.execute(schema::REMOVE_STALE_THREADS, []).await?;
    debug!("stale thread trigger installed");

    Ok(Self { gateway, config, bootstrap, threads, comments })
  }

  /// Run a statement for a collaborator. See [`Gateway::execute`].
  pub async fn execute<S, P>(&self, sql: S, params: P) -> Result<ResultSet>
  where
    S: Into<Sql>,
    P: IntoIterator<Item = Value>,
  {
    self.gateway.execute(sql, params).await
  }

  pub async fn version(&self) -> Result<u32> { self.gateway.version().await }

  /// Overwrite the stored schema version. Migration decisions follow
  /// whatever is written here.
  pub async fn set_version(&self, version: u32) -> Result<()> {
    self.gateway.set_version(version).await
  }

  /// Migrate to `to`. Already-applied steps are skipped.
  pub async fn migrate(&self, to: u32) -> Result<Vec<StepReport>> {
    migrate::migrate(&self.gateway, &self.config, to).await
  }

  pub fn bootstrap(&self) -> &Bootstrap { &self.bootstrap }

  pub fn threads(&self) -> &Threads { &self.threads }

  pub fn comments(&self) -> &Comments { &self.comments }

  pub fn path(&self) -> &Path { self.gateway.path() }

  pub fn config(&self) -> &StoreConfig { &self.config }
}

/// True if either core table exists.
async fn has_core_tables(gateway: &Gateway) -> Result<bool> {
  let rs = gateway.execute(schema::CORE_TABLES, []).await?;
  Ok(!rs.fetch_all().is_empty())
}

/// Expand a leading `~` (alone or as `~/…`) to the current user's home
/// directory. `~user` forms are not expanded.
fn expand_tilde(path: &Path) -> PathBuf {
  if let Ok(rest) = path.strip_prefix("~")
    && let Ok(home) = std::env::var("HOME")
  {
    let home = PathBuf::from(home);
    return if rest.as_os_str().is_empty() { home } else { home.join(rest) };
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn expand_tilde_uses_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    let expanded = expand_tilde(Path::new("~/quill/comments.db"));
    assert_eq!(expanded, PathBuf::from(home).join("quill/comments.db"));
  }

  #[test]
  fn expand_tilde_expands_bare_tilde() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~")), PathBuf::from(home));
  }

  #[test]
  fn expand_tilde_leaves_other_paths() {
    let path = Path::new("/var/lib/quill/comments.db");
    assert_eq!(expand_tilde(path), path.to_path_buf());
  }

  #[test]
  fn expand_tilde_leaves_other_users_and_embedded_tildes() {
    for raw in ["~alice/comments.db", "data/~/comments.db", "~backup.db"] {
      let path = Path::new(raw);
      assert_eq!(expand_tilde(path), path.to_path_buf());
    }
  }
}
