//! Author survival: the years in which each author of a group was active.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::email::EmailSet;
use crate::error::StoreError;
use crate::store::CommitStore;
use crate::types::Commit;

/// Author identity -> sorted distinct years with at least one commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SurvivalReport {
  pub author_years: BTreeMap<String, Vec<i32>>,
}

impl SurvivalReport {
  /// One `author_commits` query per author. A failed query aborts the report.
  pub fn generate(store: &(impl CommitStore + ?Sized), authors: &EmailSet) -> Result<Self, StoreError> {
    let mut author_years = BTreeMap::new();
    for author in authors.iter() {
      let commits = store.author_commits(author)?;
      author_years.insert(author.to_string(), active_years(&commits));
    }
    debug!(authors = author_years.len(), "survival report generated");
    Ok(Self { author_years })
  }

  /// Same as [`generate`](Self::generate), from commits already in memory.
  pub fn from_commits(commits: &[Commit], authors: &EmailSet) -> Self {
    let mut by_author: BTreeMap<String, BTreeSet<i32>> = authors
      .iter()
      .map(|a| (a.to_string(), BTreeSet::new()))
      .collect();
    for commit in commits {
      if let Some(years) = by_author.get_mut(commit.author_identity()) {
        years.insert(commit.year());
      }
    }
    Self {
      author_years: by_author
        .into_iter()
        .map(|(a, years)| (a, years.into_iter().collect()))
        .collect(),
    }
  }

  pub fn len(&self) -> usize {
    self.author_years.len()
  }

  pub fn is_empty(&self) -> bool {
    self.author_years.is_empty()
  }

  pub fn active_years(&self, author: &str) -> Option<&[i32]> {
    self.author_years.get(author).map(Vec::as_slice)
  }

  pub fn first_year(&self, author: &str) -> Option<i32> {
    self.active_years(author)?.first().copied()
  }

  pub fn last_year(&self, author: &str) -> Option<i32> {
    self.active_years(author)?.last().copied()
  }

  /// Calendar years from first to last activity, inclusive.
  pub fn span(&self, author: &str) -> Option<i32> {
    Some(self.last_year(author)? - self.first_year(author)? + 1)
  }

  /// Number of authors active in each year.
  pub fn yearly_active_counts(&self) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for years in self.author_years.values() {
      for year in years {
        *counts.entry(*year).or_insert(0) += 1;
      }
    }
    counts
  }

  /// Authors active in at least `min_years` distinct years.
  pub fn retained_count(&self, min_years: usize) -> usize {
    self
      .author_years
      .values()
      .filter(|years| years.len() >= min_years)
      .count()
  }

  /// Mean number of active years per author; 0 for an empty report.
  pub fn mean_active_years(&self) -> f64 {
    if self.author_years.is_empty() {
      return 0.0;
    }
    let total: usize = self.author_years.values().map(Vec::len).sum();
    total as f64 / self.author_years.len() as f64
  }
}

fn active_years(commits: &[Commit]) -> Vec<i32> {
  let years: BTreeSet<i32> = commits.iter().map(Commit::year).collect();
  years.into_iter().collect()
}
