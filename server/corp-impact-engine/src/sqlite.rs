//! SQLite-backed commit table.

use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection, Row};
use tracing::debug;

use crate::changes::Changes;
use crate::error::StoreError;
use crate::store::CommitStore;
use crate::types::{Commit, Person};

const COMMIT_COLUMNS: &str = "id, repo_name, author_name, author_email, author_time, \
  committer_name, committer_email, committer_time, subject, body, \
  num_insertions, num_deletions, num_files_changed";

pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
    let path = path.as_ref();
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    run_migrations(&conn)?;
    debug!(path = %path.display(), "opened commit database");
    Ok(Self { conn })
  }

  pub fn open_in_memory() -> Result<Self, StoreError> {
    let conn = Connection::open_in_memory()?;
    run_migrations(&conn)?;
    Ok(Self { conn })
  }

  /// Insert or replace commits by id, in one transaction.
  pub fn add_commits(&mut self, commits: &[Commit]) -> Result<usize, StoreError> {
    let tx = self.conn.transaction()?;
    {
      let mut stmt = tx.prepare(&format!(
        "INSERT OR REPLACE INTO commits ({COMMIT_COLUMNS}) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
      ))?;
      for c in commits {
        stmt.execute(params![
          c.id,
          c.repo_name,
          c.author.name,
          c.author.email,
          c.author_time,
          c.committer.name,
          c.committer.email,
          c.committer_time,
          c.subject,
          c.body,
          c.changes.insertions(),
          c.changes.deletions(),
          c.changes.files_changed,
        ])?;
      }
    }
    tx.commit()?;
    debug!(count = commits.len(), "ingested commits");
    Ok(commits.len())
  }

  pub fn commit_count(&self) -> Result<usize, StoreError> {
    let n: i64 = self
      .conn
      .query_row("SELECT COUNT(*) FROM commits", [], |row| row.get(0))?;
    Ok(n as usize)
  }

  fn query(&self, filter: &str, arg: Option<&str>) -> Result<Vec<Commit>, StoreError> {
    let sql = format!("SELECT {COMMIT_COLUMNS} FROM commits {filter} ORDER BY author_time, id");
    let mut stmt = self.conn.prepare(&sql)?;
    let rows = match arg {
      Some(arg) => stmt.query_map(params![arg], commit_from_row)?,
      None => stmt.query_map([], commit_from_row)?,
    };
    let mut out = Vec::new();
    for row in rows {
      out.push(row?);
    }
    Ok(out)
  }
}

impl CommitStore for SqliteStore {
  fn commits(&self) -> Result<Vec<Commit>, StoreError> {
    self.query("", None)
  }

  fn author_commits(&self, identity: &str) -> Result<Vec<Commit>, StoreError> {
    self.query(
      "WHERE author_email = ?1 OR (author_email = '' AND author_name = ?1)",
      Some(identity),
    )
  }

  fn domain_commits(&self, domain: &str) -> Result<Vec<Commit>, StoreError> {
    // Exact match on everything after the only '@', padding trimmed as in
    // `email_domain`.
    self.query(
      "WHERE instr(author_email, '@') > 1 \
       AND lower(trim(substr(author_email, instr(author_email, '@') + 1), \
         ' ' || char(9) || char(10) || char(13))) = lower(?1)",
      Some(domain),
    )
  }
}

fn commit_from_row(row: &Row<'_>) -> rusqlite::Result<Commit> {
  Ok(Commit {
    id: row.get(0)?,
    repo_name: row.get(1)?,
    author: Person::new(row.get::<_, String>(2)?, row.get::<_, String>(3)?),
    author_time: row.get(4)?,
    committer: Person::new(row.get::<_, String>(5)?, row.get::<_, String>(6)?),
    committer_time: row.get(7)?,
    subject: row.get(8)?,
    body: row.get(9)?,
    changes: Changes::from_parts(row.get(10)?, row.get(11)?, row.get(12)?),
  })
}

fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS commits (
      id TEXT PRIMARY KEY,
      repo_name TEXT NOT NULL DEFAULT '',
      author_name TEXT NOT NULL DEFAULT '',
      author_email TEXT NOT NULL DEFAULT '',
      author_time INTEGER NOT NULL,
      committer_name TEXT NOT NULL DEFAULT '',
      committer_email TEXT NOT NULL DEFAULT '',
      committer_time INTEGER NOT NULL DEFAULT 0,
      subject TEXT NOT NULL DEFAULT '',
      body TEXT NOT NULL DEFAULT '',
      num_insertions INTEGER NOT NULL DEFAULT 0,
      num_deletions INTEGER NOT NULL DEFAULT 0,
      num_files_changed INTEGER NOT NULL DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS commits_author_email ON commits (author_email);
    "#,
  )?;

  Ok(())
}
