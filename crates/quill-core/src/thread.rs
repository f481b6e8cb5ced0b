//! Comment threads, one per page URI.

use serde::{Deserialize, Serialize};

/// A comment thread, identified by the URI of the page it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
  pub id:    i64,
  pub uri:   String,
  pub title: Option<String>,
}
