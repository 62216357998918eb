//! Correlate two groups' yearly activity.
//!
//! Series are aligned over the contiguous span from the earliest to the latest
//! year either group touches; years a group has no bucket for read as zero.
//! A coefficient is `None` when it is undefined (a constant series, or fewer
//! than two aligned years); it is never reported as 0.

use std::fmt;

use serde::Serialize;

use crate::group_data::GroupData;
use crate::yearly::filled_range;

/// Pearson coefficients for insertions, deletions and distinct authors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Correlation {
  pub insertions: Option<f64>,
  pub deletions: Option<f64>,
  pub authors: Option<f64>,
}

/// Pearson correlation coefficient, clamped to `[-1, 1]`.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
  if xs.len() != ys.len() || xs.len() < 2 {
    return None;
  }
  let n = xs.len() as f64;
  let mean_x = xs.iter().sum::<f64>() / n;
  let mean_y = ys.iter().sum::<f64>() / n;

  let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
  for (x, y) in xs.iter().zip(ys) {
    let dx = x - mean_x;
    let dy = y - mean_y;
    cov += dx * dy;
    var_x += dx * dx;
    var_y += dy * dy;
  }

  if var_x == 0.0 || var_y == 0.0 {
    return None;
  }
  let r = cov / (var_x.sqrt() * var_y.sqrt());
  if r.is_finite() {
    Some(r.clamp(-1.0, 1.0))
  } else {
    None
  }
}

/// Years covered by either group, gaps filled.
pub fn aligned_years(a: &GroupData, b: &GroupData) -> Vec<i32> {
  let mut years = a.yearly_changes.years();
  years.extend(b.yearly_changes.years());
  years.extend(a.yearly_authors.years());
  years.extend(b.yearly_authors.years());
  filled_range(&years)
}

pub fn correlate(a: &GroupData, b: &GroupData) -> Correlation {
  let years = aligned_years(a, b);

  let insertions = |g: &GroupData| -> Vec<f64> {
    g.yearly_changes
      .series(&years, 0.0, |c| c.insertions() as f64)
  };
  let deletions = |g: &GroupData| -> Vec<f64> {
    g.yearly_changes
      .series(&years, 0.0, |c| c.deletions() as f64)
  };
  let authors = |g: &GroupData| -> Vec<f64> {
    g.yearly_authors
      .count_series(Some(&years))
      .into_iter()
      .map(|n| n as f64)
      .collect()
  };

  Correlation {
    insertions: pearson(&insertions(a), &insertions(b)),
    deletions: pearson(&deletions(a), &deletions(b)),
    authors: pearson(&authors(a), &authors(b)),
  }
}

/// Renders a coefficient, or "undefined".
pub struct Coefficient(pub Option<f64>);

impl fmt::Display for Coefficient {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.0 {
      Some(r) => write!(f, "{:.4}", r),
      None => f.write_str("undefined"),
    }
  }
}
