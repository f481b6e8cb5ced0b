//! Process-wide settings consumed by migrations.

use serde::Deserialize;

/// Seed address the rebuilt voters filter is populated with.
pub const DEFAULT_VOTERS_SEED: &str = "127.0.0.0";

/// Configuration carried by a [`SqliteStore`](crate::SqliteStore).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
  /// Key written into every comment's voters filter when the filter is
  /// rebuilt by the version 0 → 1 migration.
  pub voters_seed: String,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self { voters_seed: DEFAULT_VOTERS_SEED.to_owned() }
  }
}
