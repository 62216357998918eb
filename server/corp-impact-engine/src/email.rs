//! Sets of distinct author identities.

use std::collections::BTreeSet;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Distinct author identities (email, or name when the email is empty).
///
/// `union` and `subtract` are pure; they never mutate either operand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailSet(BTreeSet<String>);

impl EmailSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns `true` when the identity was not already present.
  pub fn insert(&mut self, identity: impl Into<String>) -> bool {
    self.0.insert(identity.into())
  }

  pub fn contains(&self, identity: &str) -> bool {
    self.0.contains(identity)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(String::as_str)
  }

  pub fn union(&self, other: &EmailSet) -> EmailSet {
    EmailSet(self.0.union(&other.0).cloned().collect())
  }

  /// Elements of `self` not in `other`, and whether that result is empty.
  pub fn subtract(&self, other: &EmailSet) -> (EmailSet, bool) {
    let rest = EmailSet(self.0.difference(&other.0).cloned().collect());
    let empty = rest.is_empty();
    (rest, empty)
  }

  pub fn intersection_len(&self, other: &EmailSet) -> usize {
    self.0.intersection(&other.0).count()
  }

  pub(crate) fn extend_from(&mut self, other: &EmailSet) {
    self.0.extend(other.0.iter().cloned());
  }

  pub(crate) fn remove_all(&mut self, other: &EmailSet) {
    self.0.retain(|e| !other.0.contains(e));
  }
}

impl<S: Into<String>> FromIterator<S> for EmailSet {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    EmailSet(iter.into_iter().map(Into::into).collect())
  }
}

impl Add for &EmailSet {
  type Output = EmailSet;

  fn add(self, rhs: Self) -> EmailSet {
    self.union(rhs)
  }
}

impl Sub for &EmailSet {
  type Output = EmailSet;

  fn sub(self, rhs: Self) -> EmailSet {
    self.subtract(rhs).0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn set(items: &[&str]) -> EmailSet {
    items.iter().copied().collect()
  }

  #[test]
  fn union_size_follows_inclusion_exclusion() {
    let a = set(&["a@x.org", "b@x.org", "shared@corp.com"]);
    let b = set(&["c@y.org", "shared@corp.com"]);
    let u = a.union(&b);
    assert_eq!(u.len(), a.len() + b.len() - a.intersection_len(&b));
    assert_eq!(u.len(), 4);
  }

  #[test]
  fn subtract_removes_only_the_intersection() {
    let a = set(&["a@x.org", "b@x.org", "shared@corp.com"]);
    let b = set(&["c@y.org", "shared@corp.com"]);
    let (rest, empty) = a.subtract(&b);
    assert!(!empty);
    assert_eq!(rest, set(&["a@x.org", "b@x.org"]));
  }

  #[test]
  fn subtract_reports_empty_result() {
    let a = set(&["a@x.org"]);
    let (rest, empty) = a.subtract(&set(&["a@x.org", "z@z.org"]));
    assert!(empty);
    assert!(rest.is_empty());
  }

  #[test]
  fn operations_leave_inputs_untouched() {
    let a = set(&["a@x.org", "b@x.org"]);
    let b = set(&["b@x.org", "c@x.org"]);
    let _ = &a + &b;
    let _ = &a - &b;
    assert_eq!(a, set(&["a@x.org", "b@x.org"]));
    assert_eq!(b, set(&["b@x.org", "c@x.org"]));
  }

  #[test]
  fn insert_is_idempotent() {
    let mut s = EmailSet::new();
    assert!(s.insert("dev@corp.com"));
    assert!(!s.insert("dev@corp.com"));
    assert_eq!(s.len(), 1);
  }
}
