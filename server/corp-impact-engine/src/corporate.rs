//! Corporate report: a named corporate group against its community complement.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use crate::activity::MonthlyActivity;
use crate::classify::{is_fallback, FALLBACK_GROUP};
use crate::config::{Config, DomainGroups};
use crate::correlation::{Coefficient, Correlation};
use crate::domain_groups::DomainGroupsReport;
use crate::error::ReportError;
use crate::group_data::GroupData;
use crate::store::CommitStore;
use crate::survival::SurvivalReport;

/// Everything one report run produces.
#[derive(Debug, Clone, Serialize)]
pub struct CorporateSummary {
  pub corporate_group_name: String,
  pub total_commits: usize,
  pub total_authors: usize,
  pub corporate: GroupData,
  pub community: GroupData,
  /// Corporate yearly series against community yearly series.
  pub correlation: Correlation,
  pub corporate_survival: SurvivalReport,
  pub community_survival: SurvivalReport,
  pub corporate_activity: MonthlyActivity,
  pub community_activity: MonthlyActivity,
}

/// Holds the configuration; [`generate`](Self::generate) runs the whole
/// pipeline from scratch each time it is called.
pub struct CorporateReport {
  config: Config,
  groups: DomainGroups,
  domain_groups: Option<DomainGroupsReport>,
  summary: Option<CorporateSummary>,
}

impl CorporateReport {
  pub fn new(groups: DomainGroups, corporate_group_name: &str) -> Self {
    Self::with_config(groups, Config::with_corporate_group(Some(corporate_group_name)))
  }

  pub fn with_config(groups: DomainGroups, config: Config) -> Self {
    Self {
      config,
      groups,
      domain_groups: None,
      summary: None,
    }
  }

  pub fn corporate_group_name(&self) -> &str {
    &self.config.corporate_group_name
  }

  pub fn summary(&self) -> Option<&CorporateSummary> {
    self.summary.as_ref()
  }

  pub fn domain_groups_report(&self) -> Option<&DomainGroupsReport> {
    self.domain_groups.as_ref()
  }

  /// Scan the store, classify, derive both groups, correlate them and build
  /// survival reports. Any store error aborts the run and leaves the previous
  /// result in place.
  pub fn generate(&mut self, store: &(impl CommitStore + ?Sized)) -> Result<&CorporateSummary, ReportError> {
    let commits = store.commits()?;

    let mut domain_groups = DomainGroupsReport::new(&self.groups);
    domain_groups.generate(&commits);

    let name = self.config.corporate_group_name.clone();
    if !is_fallback(&name) && self.groups.domains(&name).is_none() {
      warn!(group = %name, "corporate group is not configured; it will be empty");
    }
    let corporate = domain_groups.group_data(&name);
    let community = domain_groups.unknown_group_data();
    let correlation = corporate.correlation(&community);

    let corporate_survival = SurvivalReport::generate(store, &corporate.authors)?;
    let community_survival = SurvivalReport::generate(store, &community.authors)?;

    // Same membership as the GroupData views: commits of other named groups
    // belong to neither side.
    let corporate_key = if is_fallback(&name) { FALLBACK_GROUP } else { name.as_str() };
    let corporate_activity = MonthlyActivity::from_commits(
      commits
        .iter()
        .filter(|c| domain_groups.group_of(c) == corporate_key),
    );
    let community_activity = MonthlyActivity::from_commits(
      commits
        .iter()
        .filter(|c| domain_groups.group_of(c) == FALLBACK_GROUP),
    );

    info!(
      group = %name,
      corporate_authors = corporate.num_authors,
      community_authors = community.num_authors,
      "corporate report generated"
    );

    let summary = CorporateSummary {
      corporate_group_name: name,
      total_commits: domain_groups.total_commits,
      total_authors: domain_groups.total_authors.len(),
      corporate,
      community,
      correlation,
      corporate_survival,
      community_survival,
      corporate_activity,
      community_activity,
    };

    self.domain_groups = Some(domain_groups);
    Ok(&*self.summary.insert(summary))
  }
}

/// Build and run a corporate report in one call. An empty or missing name
/// selects the default "Corporate" group.
pub fn corporate_report(
  store: &(impl CommitStore + ?Sized),
  groups: DomainGroups,
  corporate_group_name: Option<&str>,
) -> Result<CorporateSummary, ReportError> {
  let config = Config::with_corporate_group(corporate_group_name);
  let mut report = CorporateReport::with_config(groups, config);
  Ok(report.generate(store)?.clone())
}

fn write_group(f: &mut fmt::Formatter<'_>, label: &str, g: &GroupData, s: &SurvivalReport) -> fmt::Result {
  writeln!(f, "{} ({})", label, g.name)?;
  writeln!(f, "\tauthors:\t{} ({:.2}%)", g.num_authors, g.authors_percent)?;
  writeln!(f, "\tinsertions:\t{} ({:.2}%)", g.insertions(), g.insertions_percent)?;
  writeln!(f, "\tdeletions:\t{} ({:.2}%)", g.deletions(), g.deletions_percent)?;
  writeln!(f, "\tfiles changed:\t{} ({:.2}%)", g.files_changed(), g.files_changed_percent)?;
  writeln!(f, "\tyearly:")?;
  for (year, changes) in g.yearly_changes.iter() {
    let authors = g.yearly_authors.get(year).map_or(0, |a| a.len());
    writeln!(
      f,
      "\t\t{}:\t+{} -{} files {} authors {}",
      year,
      changes.insertions(),
      changes.deletions(),
      changes.files_changed,
      authors
    )?;
  }
  writeln!(
    f,
    "\tsurvival:\t{} authors, {} active in 2+ years, mean {:.2} active years",
    s.len(),
    s.retained_count(2),
    s.mean_active_years()
  )
}

impl fmt::Display for CorporateSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Corporate impact report")?;
    writeln!(f, "Total commits: {}", self.total_commits)?;
    writeln!(f, "Total authors: {}", self.total_authors)?;
    write_group(f, "Corporate group", &self.corporate, &self.corporate_survival)?;
    write_group(f, "Community group", &self.community, &self.community_survival)?;
    writeln!(f, "Correlation (corporate vs community, yearly):")?;
    writeln!(f, "\tinsertions:\t{}", Coefficient(self.correlation.insertions))?;
    writeln!(f, "\tdeletions:\t{}", Coefficient(self.correlation.deletions))?;
    writeln!(f, "\tauthors:\t{}", Coefficient(self.correlation.authors))
  }
}
