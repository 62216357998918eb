//! Change algebra: componentwise add/subtract over line and file change counts.
//!
//! Results may go negative (e.g. a group total minus a larger union); negative
//! values are kept as-is, never floored.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Inserted/deleted line counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineChanges {
  #[serde(default)]
  pub insertions: i64,
  #[serde(default)]
  pub deletions: i64,
}

impl LineChanges {
  pub fn new(insertions: i64, deletions: i64) -> Self {
    Self {
      insertions,
      deletions,
    }
  }

  pub fn is_zero(&self) -> bool {
    self.insertions == 0 && self.deletions == 0
  }
}

impl Add for LineChanges {
  type Output = Self;

  fn add(self, rhs: Self) -> Self {
    Self {
      insertions: self.insertions + rhs.insertions,
      deletions: self.deletions + rhs.deletions,
    }
  }
}

impl Sub for LineChanges {
  type Output = Self;

  fn sub(self, rhs: Self) -> Self {
    Self {
      insertions: self.insertions - rhs.insertions,
      deletions: self.deletions - rhs.deletions,
    }
  }
}

impl Neg for LineChanges {
  type Output = Self;

  fn neg(self) -> Self {
    Self {
      insertions: -self.insertions,
      deletions: -self.deletions,
    }
  }
}

impl AddAssign for LineChanges {
  fn add_assign(&mut self, rhs: Self) {
    *self = *self + rhs;
  }
}

impl SubAssign for LineChanges {
  fn sub_assign(&mut self, rhs: Self) {
    *self = *self - rhs;
  }
}

/// Line changes plus the number of files touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Changes {
  #[serde(flatten)]
  pub lines: LineChanges,
  #[serde(default)]
  pub files_changed: i64,
}

impl Changes {
  pub fn new(lines: LineChanges, files_changed: i64) -> Self {
    Self {
      lines,
      files_changed,
    }
  }

  pub fn from_parts(insertions: i64, deletions: i64, files_changed: i64) -> Self {
    Self::new(LineChanges::new(insertions, deletions), files_changed)
  }

  pub fn insertions(&self) -> i64 {
    self.lines.insertions
  }

  pub fn deletions(&self) -> i64 {
    self.lines.deletions
  }

  pub fn is_zero(&self) -> bool {
    self.lines.is_zero() && self.files_changed == 0
  }
}

impl Add for Changes {
  type Output = Self;

  fn add(self, rhs: Self) -> Self {
    Self {
      lines: self.lines + rhs.lines,
      files_changed: self.files_changed + rhs.files_changed,
    }
  }
}

impl Sub for Changes {
  type Output = Self;

  fn sub(self, rhs: Self) -> Self {
    Self {
      lines: self.lines - rhs.lines,
      files_changed: self.files_changed - rhs.files_changed,
    }
  }
}

impl Neg for Changes {
  type Output = Self;

  fn neg(self) -> Self {
    Self {
      lines: -self.lines,
      files_changed: -self.files_changed,
    }
  }
}

impl AddAssign for Changes {
  fn add_assign(&mut self, rhs: Self) {
    *self = *self + rhs;
  }
}

impl SubAssign for Changes {
  fn sub_assign(&mut self, rhs: Self) {
    *self = *self - rhs;
  }
}
