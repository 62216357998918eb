//! Core types for the impact engine (commit records + JSON contract).

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::changes::Changes;

// ---------------------------------------------------------------------------
// Commit records (JSON contract: one object per line, or one table row)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub email: String,
}

impl Person {
  pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      email: email.into(),
    }
  }
}

/// One recorded change. Unknown JSON fields are silently ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
  pub id: String,
  #[serde(default)]
  pub repo_name: String,
  pub author: Person,
  /// Epoch seconds.
  pub author_time: i64,
  #[serde(default)]
  pub committer: Person,
  #[serde(default)]
  pub committer_time: i64,
  #[serde(default)]
  pub subject: String,
  #[serde(default)]
  pub body: String,
  #[serde(default)]
  pub changes: Changes,
}

impl Commit {
  /// Uniqueness key for the author: email, or name when the email is empty.
  pub fn author_identity(&self) -> &str {
    if self.author.email.is_empty() {
      &self.author.name
    } else {
      &self.author.email
    }
  }

  /// UTC calendar year of the author timestamp.
  pub fn year(&self) -> i32 {
    year_of(self.author_time)
  }

  pub fn author_datetime(&self) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(self.author_time, 0)
  }
}

/// UTC year of an epoch-seconds timestamp; out-of-range values land in 1970.
pub fn year_of(epoch_secs: i64) -> i32 {
  DateTime::from_timestamp(epoch_secs, 0).map_or(1970, |dt| dt.year())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identity_falls_back_to_name() {
    let mut c = Commit {
      id: "1".into(),
      author: Person::new("Dev", ""),
      ..Commit::default()
    };
    assert_eq!(c.author_identity(), "Dev");
    c.author.email = "dev@corp.com".into();
    assert_eq!(c.author_identity(), "dev@corp.com");
  }

  #[test]
  fn year_is_utc() {
    // 2019-12-31T23:30:00Z; still 2019 in UTC even if local time is 2020.
    assert_eq!(year_of(1_577_835_000), 2019);
    assert_eq!(year_of(1_577_836_800), 2020);
  }

  #[test]
  fn minimal_json_commit_parses() {
    let json = r#"{"id":"abc","author":{"name":"A","email":"a@x.org"},"author_time":0,
      "changes":{"insertions":3,"deletions":1,"files_changed":2},"extra":"ignored"}"#;
    let c: Commit = serde_json::from_str(json).unwrap();
    assert_eq!(c.changes, Changes::from_parts(3, 1, 2));
    assert_eq!(c.year(), 1970);
    assert!(c.subject.is_empty());
  }
}
