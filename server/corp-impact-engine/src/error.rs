//! Structured error types for the impact engine.
//!
//! Data anomalies (malformed emails, empty identities, constant series) are not
//! errors; they resolve to fallback values where they occur.

use thiserror::Error;

/// The domain-group mapping could not be read or is malformed. Fatal to the run.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config: {field}: {reason}")]
  Invalid { field: String, reason: String },

  #[error("config json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("config io: {0}")]
  Io(#[from] std::io::Error),
}

impl ConfigError {
  pub fn invalid(field: &str, reason: &str) -> Self {
    Self::Invalid {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }
}

/// A commit store query failed or a commit stream could not be read.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("sqlite: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("store io: {0}")]
  Io(#[from] std::io::Error),

  #[error("commit json at line {line}: {source}")]
  JsonLine {
    line: usize,
    #[source]
    source: serde_json::Error,
  },
}

/// Report generation failed; no partial report is produced.
#[derive(Debug, Error)]
pub enum ReportError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Store(#[from] StoreError),
}
