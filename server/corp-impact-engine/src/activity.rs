//! Month-level activity counts (UTC): insertions, deletions and distinct authors.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use serde::Serialize;

use crate::types::Commit;

/// year -> month (1..=12) -> count.
pub type YearMonthCount = BTreeMap<i32, BTreeMap<u32, i64>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyActivity {
  pub insertions: YearMonthCount,
  pub deletions: YearMonthCount,
  /// Each author counted once per month.
  pub authors: YearMonthCount,
}

impl MonthlyActivity {
  pub fn from_commits<'a>(commits: impl IntoIterator<Item = &'a Commit>) -> Self {
    let mut out = Self::default();
    let mut seen: BTreeSet<(i32, u32, &str)> = BTreeSet::new();

    for commit in commits {
      let (year, month) = commit
        .author_datetime()
        .map_or((1970, 1), |dt| (dt.year(), dt.month()));

      add(&mut out.insertions, year, month, commit.changes.insertions());
      add(&mut out.deletions, year, month, commit.changes.deletions());

      let identity = commit.author_identity();
      if !identity.is_empty() && seen.insert((year, month, identity)) {
        add(&mut out.authors, year, month, 1);
      }
    }
    out
  }

  pub fn get(counts: &YearMonthCount, year: i32, month: u32) -> i64 {
    counts
      .get(&year)
      .and_then(|months| months.get(&month))
      .copied()
      .unwrap_or(0)
  }
}

fn add(counts: &mut YearMonthCount, year: i32, month: u32, value: i64) {
  *counts.entry(year).or_default().entry(month).or_insert(0) += value;
}
