//! One group's derived view: totals, shares of the repository and yearly series.

use serde::Serialize;

use crate::changes::Changes;
use crate::correlation::{self, Correlation};
use crate::email::EmailSet;
use crate::yearly::{YearlyChangeMap, YearlyEmailMap};

/// Grand totals a group is measured against, captured when the report ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
  pub authors: usize,
  pub changes: Changes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupData {
  pub name: String,
  pub num_authors: usize,
  pub authors: EmailSet,
  pub changes: Changes,
  pub authors_percent: f64,
  pub insertions_percent: f64,
  pub deletions_percent: f64,
  pub files_changed_percent: f64,
  pub yearly_changes: YearlyChangeMap,
  pub yearly_authors: YearlyEmailMap,
}

impl GroupData {
  pub fn new(
    name: impl Into<String>,
    authors: EmailSet,
    changes: Changes,
    yearly_changes: YearlyChangeMap,
    yearly_authors: YearlyEmailMap,
    totals: Totals,
  ) -> Self {
    Self {
      name: name.into(),
      num_authors: authors.len(),
      authors_percent: percent(authors.len() as i64, totals.authors as i64),
      insertions_percent: percent(changes.insertions(), totals.changes.insertions()),
      deletions_percent: percent(changes.deletions(), totals.changes.deletions()),
      files_changed_percent: percent(changes.files_changed, totals.changes.files_changed),
      authors,
      changes,
      yearly_changes,
      yearly_authors,
    }
  }

  pub fn insertions(&self) -> i64 {
    self.changes.insertions()
  }

  pub fn deletions(&self) -> i64 {
    self.changes.deletions()
  }

  pub fn files_changed(&self) -> i64 {
    self.changes.files_changed
  }

  /// Pearson coefficients of this group's yearly series against `other`'s.
  pub fn correlation(&self, other: &GroupData) -> Correlation {
    correlation::correlate(self, other)
  }
}

/// `part / whole * 100`; a zero whole yields 0.
pub fn percent(part: i64, whole: i64) -> f64 {
  if whole == 0 {
    0.0
  } else {
    part as f64 / whole as f64 * 100.0
  }
}
