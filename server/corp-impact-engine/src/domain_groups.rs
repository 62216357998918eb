//! Whole-repository classification of commit authors by email domain.
//!
//! One pass over the commits accumulates per-domain rollups and grand totals.
//! A named group's view is the sum of its domains; the complement view
//! ("unknown"/community) is the grand total minus the deduplicated union of
//! every named group's domains.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::changes::Changes;
use crate::classify::{email_domain, is_fallback, DomainClassifier, FALLBACK_GROUP};
use crate::config::DomainGroups;
use crate::email::EmailSet;
use crate::error::StoreError;
use crate::group_data::{percent, GroupData, Totals};
use crate::store::CommitStore;
use crate::types::Commit;
use crate::yearly::{YearlyChangeMap, YearlyEmailMap};

/// Everything accumulated for one email domain (or one group, once summed).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DomainRollup {
  pub num_commits: usize,
  pub authors: EmailSet,
  pub changes: Changes,
  pub yearly_changes: YearlyChangeMap,
  pub yearly_authors: YearlyEmailMap,
}

impl DomainRollup {
  /// Fold one commit in. `identity` is `None` for commits with no author identity.
  pub fn record(&mut self, commit: &Commit, identity: Option<&str>) {
    let year = commit.year();
    self.num_commits += 1;
    self.changes += commit.changes;
    self.yearly_changes.add_bucket(year, &commit.changes);
    if let Some(identity) = identity {
      self.authors.insert(identity);
      self.yearly_authors.insert_author(year, identity);
    }
  }

  pub fn from_commits(commits: &[Commit]) -> Self {
    let mut rollup = Self::default();
    for commit in commits {
      rollup.record(commit, non_empty(commit.author_identity()));
    }
    rollup
  }

  pub fn merge_from(&mut self, other: &DomainRollup) {
    self.num_commits += other.num_commits;
    self.authors = self.authors.union(&other.authors);
    self.changes += other.changes;
    self.yearly_changes.merge_from(&other.yearly_changes);
    self.yearly_authors.merge_from(&other.yearly_authors);
  }
}

/// Author counts of one group, broken down by domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainGroup {
  pub name: String,
  pub author_count: usize,
  pub domain_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default)]
pub struct DomainGroupsReport {
  groups: DomainGroups,
  classifier: DomainClassifier,

  pub total_authors: EmailSet,
  pub total_changes: Changes,
  pub total_yearly_changes: YearlyChangeMap,
  pub total_yearly_authors: YearlyEmailMap,
  pub total_commits: usize,
  /// Per-domain rollups, keyed by lower-cased domain.
  pub domains: BTreeMap<String, DomainRollup>,
  /// Identities whose email is missing or malformed; they have no domain.
  pub undomained_authors: EmailSet,
}

impl DomainGroupsReport {
  pub fn new(groups: &DomainGroups) -> Self {
    Self {
      groups: groups.clone(),
      classifier: DomainClassifier::new(groups),
      ..Self::default()
    }
  }

  pub fn groups(&self) -> &DomainGroups {
    &self.groups
  }

  pub fn classifier(&self) -> &DomainClassifier {
    &self.classifier
  }

  /// Recompute every aggregate from `commits`, discarding earlier results.
  pub fn generate(&mut self, commits: &[Commit]) {
    self.reset();
    for commit in commits {
      self.add_commit(commit);
    }
    info!(
      commits = self.total_commits,
      authors = self.total_authors.len(),
      domains = self.domains.len(),
      "domain groups report generated"
    );
  }

  /// Full scan of `store`, then [`generate`](Self::generate). On a store error
  /// nothing is recomputed and the error is returned.
  pub fn generate_from_store(&mut self, store: &(impl CommitStore + ?Sized)) -> Result<(), StoreError> {
    let commits = store.commits()?;
    self.generate(&commits);
    Ok(())
  }

  fn reset(&mut self) {
    self.total_authors = EmailSet::new();
    self.total_changes = Changes::default();
    self.total_yearly_changes = YearlyChangeMap::new();
    self.total_yearly_authors = YearlyEmailMap::new();
    self.total_commits = 0;
    self.domains.clear();
    self.undomained_authors = EmailSet::new();
  }

  fn add_commit(&mut self, commit: &Commit) {
    let year = commit.year();
    let identity = non_empty(commit.author_identity());

    self.total_commits += 1;
    self.total_changes += commit.changes;
    self.total_yearly_changes.add_bucket(year, &commit.changes);
    if let Some(identity) = identity {
      self.total_authors.insert(identity);
      self.total_yearly_authors.insert_author(year, identity);
    }

    match email_domain(&commit.author.email) {
      Some(domain) => {
        self.domains.entry(domain).or_default().record(commit, identity);
      }
      None => {
        if let Some(identity) = identity {
          if self.undomained_authors.insert(identity) {
            debug!(identity, "author without a usable email domain");
          }
        }
      }
    }
  }

  /// Group a commit's author belongs to.
  pub fn group_of(&self, commit: &Commit) -> &str {
    self.classifier.classify(&commit.author.email)
  }

  pub fn totals(&self) -> Totals {
    Totals {
      authors: self.total_authors.len(),
      changes: self.total_changes,
    }
  }

  /// Sum of every domain `group` owns. Empty or fallback names yield the
  /// complement view.
  pub fn group_data(&self, group: &str) -> GroupData {
    if is_fallback(group) {
      return self.unknown_group_data();
    }
    let rollup = self.sum_domains(self.classifier.domains_of(group));
    self.to_group_data(group, rollup)
  }

  /// Grand totals minus the union of every named group.
  pub fn unknown_group_data(&self) -> GroupData {
    let named = self.sum_domains(self.classifier.named_domains().into_iter());

    let (authors, _) = self.total_authors.subtract(&named.authors);
    let changes = self.total_changes - named.changes;
    let yearly_changes = self.total_yearly_changes.difference(&named.yearly_changes);
    let yearly_authors = self.total_yearly_authors.difference(&named.yearly_authors);

    GroupData::new(
      FALLBACK_GROUP,
      authors,
      changes,
      yearly_changes,
      yearly_authors,
      self.totals(),
    )
  }

  fn sum_domains<'a>(&self, domains: impl Iterator<Item = &'a str>) -> DomainRollup {
    let mut sum = DomainRollup::default();
    for domain in domains {
      if let Some(rollup) = self.domains.get(domain) {
        sum.merge_from(rollup);
      }
    }
    sum
  }

  fn to_group_data(&self, name: &str, rollup: DomainRollup) -> GroupData {
    GroupData::new(
      name,
      rollup.authors,
      rollup.changes,
      rollup.yearly_changes,
      rollup.yearly_authors,
      self.totals(),
    )
  }

  /// Per-group author counts with their domain breakdown, largest group first.
  /// Authors without a domain are listed under the fallback group as "unknown".
  pub fn domain_groups(&self) -> Vec<DomainGroup> {
    let mut by_group: BTreeMap<String, DomainGroup> = BTreeMap::new();
    for (domain, rollup) in &self.domains {
      let name = self
        .classifier
        .group_of_domain(domain)
        .unwrap_or(FALLBACK_GROUP)
        .to_string();
      let group = by_group.entry(name.clone()).or_insert_with(|| DomainGroup {
        name,
        author_count: 0,
        domain_counts: BTreeMap::new(),
      });
      group.author_count += rollup.authors.len();
      group.domain_counts.insert(domain.clone(), rollup.authors.len());
    }
    if !self.undomained_authors.is_empty() {
      let group = by_group
        .entry(FALLBACK_GROUP.to_string())
        .or_insert_with(|| DomainGroup {
          name: FALLBACK_GROUP.to_string(),
          author_count: 0,
          domain_counts: BTreeMap::new(),
        });
      group.author_count += self.undomained_authors.len();
      *group.domain_counts.entry(FALLBACK_GROUP.to_string()).or_insert(0) +=
        self.undomained_authors.len();
    }

    let mut groups: Vec<DomainGroup> = by_group.into_values().collect();
    groups.sort_by(|a, b| {
      b.author_count
        .cmp(&a.author_count)
        .then_with(|| a.name.cmp(&b.name))
    });
    groups
  }

  /// Share of all authors held by `group`, in percent.
  pub fn group_percentage_of_total(&self, group: &str) -> f64 {
    percent(self.group_data(group).num_authors as i64, self.total_authors.len() as i64)
  }
}

/// Totals for a single domain, straight from the store's domain query.
pub fn domain_summary(store: &(impl CommitStore + ?Sized), domain: &str) -> Result<DomainRollup, StoreError> {
  let commits = store.domain_commits(domain)?;
  Ok(DomainRollup::from_commits(&commits))
}

fn non_empty(s: &str) -> Option<&str> {
  if s.is_empty() {
    None
  } else {
    Some(s)
  }
}

impl fmt::Display for DomainGroupsReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Author domain groups report")?;
    writeln!(f, "Total repository authors: {}", self.total_authors.len())?;
    writeln!(f, "Number of authors by group:")?;
    for group in self.domain_groups() {
      writeln!(
        f,
        "\t\"{}\":\t{} ({:.2}%)",
        group.name,
        group.author_count,
        percent(group.author_count as i64, self.total_authors.len() as i64)
      )?;
      let mut domains: Vec<(&String, &usize)> = group.domain_counts.iter().collect();
      domains.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
      for (domain, count) in domains {
        writeln!(f, "\t\t{}:\t{}", domain, count)?;
      }
    }
    Ok(())
  }
}
