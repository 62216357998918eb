//! Read-only commit store interface plus an in-memory implementation.

use std::io::BufRead;

use crate::classify::email_domain;
use crate::error::StoreError;
use crate::types::Commit;

/// Queries the report engine issues against an already-populated commit table.
pub trait CommitStore {
  /// Every commit in the store.
  fn commits(&self) -> Result<Vec<Commit>, StoreError>;

  /// Commits whose author identity (email, or name when the email is empty)
  /// equals `identity`.
  fn author_commits(&self, identity: &str) -> Result<Vec<Commit>, StoreError>;

  /// Commits whose author email domain is exactly `domain` (case-insensitive).
  fn domain_commits(&self, domain: &str) -> Result<Vec<Commit>, StoreError>;
}

/// Commits held in a `Vec`, e.g. read from JSON lines.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  commits: Vec<Commit>,
}

impl MemoryStore {
  pub fn new(commits: Vec<Commit>) -> Self {
    Self { commits }
  }

  /// One commit JSON object per line; blank lines are skipped.
  pub fn from_json_lines(reader: impl BufRead) -> Result<Self, StoreError> {
    let mut commits = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
      let line = line?;
      let trimmed = line.trim();
      if trimmed.is_empty() {
        continue;
      }
      let commit: Commit = serde_json::from_str(trimmed).map_err(|source| StoreError::JsonLine {
        line: idx + 1,
        source,
      })?;
      commits.push(commit);
    }
    Ok(Self { commits })
  }

  pub fn len(&self) -> usize {
    self.commits.len()
  }

  pub fn is_empty(&self) -> bool {
    self.commits.is_empty()
  }

  pub fn into_commits(self) -> Vec<Commit> {
    self.commits
  }
}

impl CommitStore for MemoryStore {
  fn commits(&self) -> Result<Vec<Commit>, StoreError> {
    Ok(self.commits.clone())
  }

  fn author_commits(&self, identity: &str) -> Result<Vec<Commit>, StoreError> {
    Ok(
      self
        .commits
        .iter()
        .filter(|c| c.author_identity() == identity)
        .cloned()
        .collect(),
    )
  }

  fn domain_commits(&self, domain: &str) -> Result<Vec<Commit>, StoreError> {
    let domain = domain.to_ascii_lowercase();
    Ok(
      self
        .commits
        .iter()
        .filter(|c| email_domain(&c.author.email).as_deref() == Some(domain.as_str()))
        .cloned()
        .collect(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::Person;

  fn commit(id: &str, name: &str, email: &str) -> Commit {
    Commit {
      id: id.into(),
      author: Person::new(name, email),
      ..Commit::default()
    }
  }

  #[test]
  fn reads_json_lines_and_skips_blanks() {
    let input = "{\"id\":\"a\",\"author\":{\"name\":\"A\",\"email\":\"a@x.org\"},\"author_time\":1}\n\n   \n\
                 {\"id\":\"b\",\"author\":{\"name\":\"B\",\"email\":\"\"},\"author_time\":2}\n";
    let store = MemoryStore::from_json_lines(input.as_bytes()).unwrap();
    assert_eq!(store.len(), 2);
  }

  #[test]
  fn bad_json_line_reports_line_number() {
    let input = "{\"id\":\"a\",\"author\":{},\"author_time\":1}\nnot json\n";
    let err = MemoryStore::from_json_lines(input.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("line 2"), "{}", err);
  }

  #[test]
  fn author_commits_match_identity() {
    let store = MemoryStore::new(vec![
      commit("1", "Dev", "dev@acme.com"),
      commit("2", "Anon", ""),
      commit("3", "Other", "other@acme.com"),
    ]);
    assert_eq!(store.author_commits("dev@acme.com").unwrap().len(), 1);
    assert_eq!(store.author_commits("Anon").unwrap()[0].id, "2");
  }

  #[test]
  fn domain_commits_do_not_over_match() {
    let store = MemoryStore::new(vec![
      commit("1", "A", "a@foo.com"),
      commit("2", "B", "b@myfoo.com"),
      commit("3", "C", "c@FOO.com"),
    ]);
    let ids: Vec<String> = store
      .domain_commits("foo.com")
      .unwrap()
      .into_iter()
      .map(|c| c.id)
      .collect();
    assert_eq!(ids, vec!["1", "3"]);
  }
}
