//! Author email -> domain -> configured group.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::config::DomainGroups;

/// Reserved name of the complement bucket (authors in no configured group).
pub const FALLBACK_GROUP: &str = "unknown";

/// Characters stripped from both ends of a domain. The SQLite store trims
/// the same set.
pub const DOMAIN_PADDING: &[char] = &[' ', '\t', '\n', '\r'];

/// Domain part of an email, lower-cased. `None` unless the address splits on
/// `@` into exactly two non-empty parts.
pub fn email_domain(email: &str) -> Option<String> {
  let mut parts = email.split('@');
  match (parts.next(), parts.next(), parts.next()) {
    (Some(local), Some(domain), None) if !local.is_empty() => {
      let domain = domain.trim_matches(DOMAIN_PADDING);
      if domain.is_empty() {
        None
      } else {
        Some(domain.to_ascii_lowercase())
      }
    }
    _ => None,
  }
}

pub fn is_fallback(group: &str) -> bool {
  group.is_empty() || group == FALLBACK_GROUP
}

/// Lookup table built from a [`DomainGroups`] mapping.
///
/// When a domain is listed under several groups, the group visited last (in
/// group-name order) owns it. Domains listed under the reserved
/// [`FALLBACK_GROUP`] are left unclaimed, so they count toward the complement.
#[derive(Debug, Clone, Default)]
pub struct DomainClassifier {
  domain_to_group: BTreeMap<String, String>,
}

impl DomainClassifier {
  pub fn new(groups: &DomainGroups) -> Self {
    let mut domain_to_group: BTreeMap<String, String> = BTreeMap::new();
    for (group, domains) in groups.iter() {
      if is_fallback(group) {
        warn!(
          group,
          "group uses the reserved fallback name; its domains stay in the complement"
        );
        continue;
      }
      for domain in domains {
        if let Some(previous) = domain_to_group.insert(domain.clone(), group.to_string()) {
          if previous != group {
            warn!(
              domain = %domain,
              previous = %previous,
              winner = group,
              "domain configured in two groups; last group wins"
            );
          }
        }
      }
    }
    Self { domain_to_group }
  }

  /// Group name for an author email, or [`FALLBACK_GROUP`].
  pub fn classify(&self, email: &str) -> &str {
    email_domain(email)
      .and_then(|d| self.domain_to_group.get(&d))
      .map_or(FALLBACK_GROUP, String::as_str)
  }

  pub fn group_of_domain(&self, domain: &str) -> Option<&str> {
    self.domain_to_group.get(domain).map(String::as_str)
  }

  /// Domains owned by `group` after conflict resolution.
  pub fn domains_of<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    self
      .domain_to_group
      .iter()
      .filter(move |(_, g)| g.as_str() == group)
      .map(|(d, _)| d.as_str())
  }

  /// Every domain owned by some named group, each exactly once.
  pub fn named_domains(&self) -> BTreeSet<&str> {
    self.domain_to_group.keys().map(String::as_str).collect()
  }
}
