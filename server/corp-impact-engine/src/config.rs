//! Report configuration: the group -> email domains mapping plus report options.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CORPORATE_GROUP: &str = "Corporate";

/// Group name -> email domains, e.g. `{"Acme": ["acme.com", "acme.io"]}`.
///
/// Groups iterate in name order. Domains are trimmed, lower-cased and
/// deduplicated on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainGroups(BTreeMap<String, Vec<String>>);

impl DomainGroups {
  pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
    let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
    Self::from_map(raw)
  }

  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let json = fs::read_to_string(path)?;
    Self::from_json_str(&json)
  }

  /// Validate and normalize a raw mapping.
  pub fn from_map(raw: BTreeMap<String, Vec<String>>) -> Result<Self, ConfigError> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (group, domains) in raw {
      let group = group.trim().to_string();
      if group.is_empty() {
        return Err(ConfigError::invalid("group", "group name must not be empty"));
      }
      // Names differing only by surrounding whitespace share one entry.
      let normalized = groups.entry(group.clone()).or_default();
      for domain in domains {
        let domain = domain.trim().to_ascii_lowercase();
        if domain.is_empty() {
          return Err(ConfigError::invalid(&group, "domain must not be empty"));
        }
        if domain.contains('@') {
          return Err(ConfigError::invalid(
            &group,
            &format!("expected a bare domain, got {:?}", domain),
          ));
        }
        if !normalized.contains(&domain) {
          normalized.push(domain);
        }
      }
    }
    Ok(Self(groups))
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
    self.0.iter().map(|(g, d)| (g.as_str(), d.as_slice()))
  }

  pub fn group_names(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  pub fn domains(&self, group: &str) -> Option<&[String]> {
    self.0.get(group).map(Vec::as_slice)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

/// Report options with sane defaults.
#[derive(Debug, Clone)]
pub struct Config {
  /// Configured group reported as "corporate"; everything else is community.
  pub corporate_group_name: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      corporate_group_name: DEFAULT_CORPORATE_GROUP.to_string(),
    }
  }
}

impl Config {
  /// Empty or missing names fall back to [`DEFAULT_CORPORATE_GROUP`].
  pub fn with_corporate_group(name: Option<&str>) -> Self {
    match name.map(str::trim) {
      Some(name) if !name.is_empty() => Self {
        corporate_group_name: name.to_string(),
      },
      _ => Self::default(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn loads_and_normalizes_domains() {
    let groups =
      DomainGroups::from_json_str(r#"{"Acme": [" Acme.com ", "acme.io", "ACME.com"]}"#).unwrap();
    assert_eq!(
      groups.domains("Acme").unwrap(),
      &["acme.com".to_string(), "acme.io".to_string()]
    );
  }

  #[test]
  fn rejects_email_in_domain_list() {
    let err = DomainGroups::from_json_str(r#"{"Acme": ["dev@acme.com"]}"#).unwrap_err();
    assert!(err.to_string().contains("Acme"));
  }

  #[test]
  fn rejects_empty_group_name() {
    let err = DomainGroups::from_json_str(r#"{"  ": ["acme.com"]}"#).unwrap_err();
    assert!(err.to_string().contains("group"));
  }

  #[test]
  fn malformed_json_is_a_config_error() {
    let err = DomainGroups::from_json_str(r#"["acme.com"]"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
  }

  #[test]
  fn corporate_name_defaults_when_blank() {
    assert_eq!(Config::with_corporate_group(None).corporate_group_name, "Corporate");
    assert_eq!(Config::with_corporate_group(Some("")).corporate_group_name, "Corporate");
    assert_eq!(Config::with_corporate_group(Some("Acme")).corporate_group_name, "Acme");
  }
}
