//! quill-admin binary.
//!
//! Reads `config.toml` (or the path given with `--config`) and `QUILL_*`
//! environment variables, opens the comment store (which migrates it if
//! needed) and reports the schema version it ends up at.
//!
//! ```
//! QUILL_STORE_PATH=~/.local/share/quill/comments.db cargo run -p quill-admin
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use quill_store_sqlite::{Bootstrap, SqliteStore, StoreConfig};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Quill comment store administration")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Only print the schema version, without the summary line.
  #[arg(short, long)]
  quiet: bool,
}

/// Settings read from the config file and environment.
#[derive(Deserialize)]
struct AdminConfig {
  store_path:  PathBuf,
  #[serde(flatten)]
  store:       StoreConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("QUILL"))
    .build()
    .context("failed to read config file")?;

  let admin_cfg: AdminConfig = settings
    .try_deserialize()
    .context("failed to deserialise AdminConfig")?;

  let store = SqliteStore::open(&admin_cfg.store_path, admin_cfg.store)
    .await
    .with_context(|| format!("failed to open store at {:?}", admin_cfg.store_path))?;

  let version = store.version().await.context("failed to read schema version")?;

  match store.bootstrap() {
    Bootstrap::Fresh => tracing::info!(path = ?store.path(), version, "initialised new store"),
    Bootstrap::Existing(steps) if steps.is_empty() => {
      tracing::info!(path = ?store.path(), version, "store already up to date")
    }
    Bootstrap::Existing(steps) => {
      for step in steps {
        tracing::info!(from = step.from, to = step.to, rows = step.rows, "{}", step.description);
      }
    }
  }

  if cli.quiet {
    println!("{version}");
  } else {
    println!("{}: schema version {version}", store.path().display());
  }

  Ok(())
}
