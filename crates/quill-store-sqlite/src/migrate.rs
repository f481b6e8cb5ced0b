//! Versioned, forward-only data migrations.
//!
//! Each [`Step`] moves the store from `from` to `from + 1`. A step and the
//! version stamp that records it commit in one transaction, so a failed step
//! leaves both the rows and the version untouched and is retried on the next
//! open.

use quill_core::Bloomfilter;
use rusqlite::Transaction;
use tracing::{debug, info};

use crate::{Error, Gateway, Result, StoreConfig, version};

/// The schema version a fully migrated store carries.
pub const MAX_VERSION: u32 = 1;

/// A single migration step keyed by the version it starts from.
pub(crate) struct Step {
  pub from:        u32,
  pub description: &'static str,
  /// Returns the number of rows rewritten.
  pub apply:       fn(&Transaction<'_>, &StoreConfig) -> rusqlite::Result<usize>,
}

/// All steps in version order.
const STEPS: &[Step] = &[Step {
  from:        0,
  description: "rebuild voters filters polluted by earlier commenters",
  apply:       reset_voters,
}];

// Step `i` must start at version `i`, and every gap up to `MAX_VERSION` must
// be covered.
const _: () = {
  assert!(STEPS.len() == MAX_VERSION as usize, "migration steps do not reach MAX_VERSION");
  let mut i = 0;
  while i < STEPS.len() {
    assert!(STEPS[i].from as usize == i, "migration steps are not contiguous");
    i += 1;
  }
};

/// Outcome of one applied step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
  pub from:        u32,
  pub to:          u32,
  pub description: &'static str,
  pub rows:        usize,
}

/// Apply every step between the current version and `to`.
///
/// A no-op returning no reports when the store is already at or past `to`.
pub(crate) async fn migrate(
  gateway: &Gateway,
  config:  &StoreConfig,
  to:      u32,
) -> Result<Vec<StepReport>> {
  let current = gateway.version().await?;
  if current >= to {
    debug!(current, to, "schema already at target version");
    return Ok(Vec::new());
  }
  if to > MAX_VERSION {
    return Err(Error::UnknownVersion(to));
  }

  info!(from = current, to, "migrating store");

  let mut reports = Vec::with_capacity((to - current) as usize);
  for step in &STEPS[current as usize..to as usize] {
    let next = step.from + 1;
    let config = config.clone();

    let rows = gateway
      .with_connection(move |conn| {
        let tx = conn.transaction()?;
        let rows = (step.apply)(&tx, &config)?;
        version::write(&tx, next)?;
        tx.commit()?;
        Ok(rows)
      })
      .await
      .map_err(|source| Error::Migration {
        from:   step.from,
        to:     next,
        source: Box::new(source),
      })?;

    info!(from = step.from, to = next, rows, step = step.description, "migration step applied");
    reports.push(StepReport {
      from:        step.from,
      to:          next,
      description: step.description,
      rows,
    });
  }

  Ok(reports)
}

// ─── Steps ───────────────────────────────────────────────────────────────────

/// The filter used to be seeded with the previous commenter's address, which
/// marked unrelated readers as having voted. Overwrite every row with a
/// filter holding only the configured seed.
fn reset_voters(tx: &Transaction<'_>, config: &StoreConfig) -> rusqlite::Result<usize> {
  let filter: Bloomfilter = [config.voters_seed.as_str()].into_iter().collect();
  tx.execute("UPDATE comments SET voters = ?1", [filter.as_bytes()])
}
