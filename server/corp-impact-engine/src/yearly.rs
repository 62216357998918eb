//! Year-bucketed aggregates: calendar year (UTC) -> change totals or author sets.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::changes::{Changes, LineChanges};
use crate::email::EmailSet;
use crate::types::Commit;

/// A value that can live in a yearly bucket and be merged/deducted in place.
pub trait Bucket: Clone {
  fn absorb(&mut self, other: &Self);
  fn deduct(&mut self, other: &Self);

  /// Vacant buckets are dropped after a subtraction.
  fn is_vacant(&self) -> bool {
    false
  }
}

impl Bucket for LineChanges {
  fn absorb(&mut self, other: &Self) {
    *self += *other;
  }

  fn deduct(&mut self, other: &Self) {
    *self -= *other;
  }
}

impl Bucket for Changes {
  fn absorb(&mut self, other: &Self) {
    *self += *other;
  }

  fn deduct(&mut self, other: &Self) {
    *self -= *other;
  }
}

impl Bucket for EmailSet {
  fn absorb(&mut self, other: &Self) {
    self.extend_from(other);
  }

  fn deduct(&mut self, other: &Self) {
    self.remove_all(other);
  }

  fn is_vacant(&self) -> bool {
    self.is_empty()
  }
}

/// Year -> bucket value, ordered by year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearlyMap<V>(BTreeMap<i32, V>);

pub type YearlyLineChangeMap = YearlyMap<LineChanges>;
pub type YearlyChangeMap = YearlyMap<Changes>;
pub type YearlyEmailMap = YearlyMap<EmailSet>;

impl<V> Default for YearlyMap<V> {
  fn default() -> Self {
    Self(BTreeMap::new())
  }
}

impl<V: Bucket> YearlyMap<V> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Merge `value` into `year`'s bucket, creating the bucket if needed.
  pub fn add_bucket(&mut self, year: i32, value: &V) {
    match self.0.get_mut(&year) {
      Some(existing) => existing.absorb(value),
      None => {
        self.0.insert(year, value.clone());
      }
    }
  }

  /// Deduct `value` from an existing bucket. Absent years are left absent.
  pub fn subtract_bucket(&mut self, year: i32, value: &V) {
    let vacant = match self.0.get_mut(&year) {
      Some(existing) => {
        existing.deduct(value);
        existing.is_vacant()
      }
      None => return,
    };
    if vacant {
      self.0.remove(&year);
    }
  }

  pub fn merge_from(&mut self, other: &Self) {
    for (year, value) in &other.0 {
      self.add_bucket(*year, value);
    }
  }

  pub fn difference_from(&mut self, other: &Self) {
    for (year, value) in &other.0 {
      self.subtract_bucket(*year, value);
    }
  }

  pub fn merge(&self, other: &Self) -> Self {
    let mut out = self.clone();
    out.merge_from(other);
    out
  }

  pub fn difference(&self, other: &Self) -> Self {
    let mut out = self.clone();
    out.difference_from(other);
    out
  }

  pub fn get(&self, year: i32) -> Option<&V> {
    self.0.get(&year)
  }

  pub fn years(&self) -> Vec<i32> {
    self.0.keys().copied().collect()
  }

  pub fn iter(&self) -> impl Iterator<Item = (i32, &V)> {
    self.0.iter().map(|(y, v)| (*y, v))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// One value per requested year; years without a bucket read as `missing`.
  pub fn series<T>(&self, years: &[i32], missing: T, f: impl Fn(&V) -> T) -> Vec<T>
  where
    T: Clone,
  {
    years
      .iter()
      .map(|y| self.0.get(y).map_or_else(|| missing.clone(), &f))
      .collect()
  }
}

impl YearlyChangeMap {
  pub fn line_changes(&self) -> YearlyLineChangeMap {
    YearlyMap(self.0.iter().map(|(y, c)| (*y, c.lines)).collect())
  }
}

impl YearlyEmailMap {
  /// Distinct-author counts for `years`, or for every bucketed year when `None`.
  pub fn count_series(&self, years: Option<&[i32]>) -> Vec<usize> {
    match years {
      Some(years) => self.series(years, 0, EmailSet::len),
      None => self.0.values().map(EmailSet::len).collect(),
    }
  }

  pub fn insert_author(&mut self, year: i32, identity: &str) {
    self.0.entry(year).or_default().insert(identity);
  }
}

/// Sorted distinct commit years; with `exclude_empty == false` the gaps between
/// the first and last year are filled in.
pub fn year_range(commits: &[Commit], exclude_empty: bool) -> Vec<i32> {
  let years: BTreeSet<i32> = commits.iter().map(Commit::year).collect();
  let years: Vec<i32> = years.into_iter().collect();
  if exclude_empty {
    years
  } else {
    filled_range(&years)
  }
}

/// Contiguous years from the smallest to the largest of `years`.
pub fn filled_range(years: &[i32]) -> Vec<i32> {
  match (years.iter().min(), years.iter().max()) {
    (Some(&first), Some(&last)) => (first..=last).collect(),
    _ => Vec::new(),
  }
}
