//! Integration tests for the corporate impact engine.

use corp_impact_engine::activity::YearMonthCount;
use corp_impact_engine::domain_groups::domain_summary;
use corp_impact_engine::{
  corporate_report, CommitStore, DomainGroups, DomainGroupsReport, MemoryStore, SqliteStore,
  StoreError,
};

// 2019-05-01, 2020-05-01, 2021-05-01 (UTC).
const Y2019: i64 = 1_556_668_800;
const Y2020: i64 = 1_588_291_200;
const Y2021: i64 = 1_619_827_200;

fn line(id: &str, name: &str, email: &str, time: i64, ins: i64, del: i64) -> String {
  format!(
    r#"{{"id": "{id}", "repo_name": "widgets", "author": {{"name": "{name}", "email": "{email}"}}, "author_time": {time}, "subject": "change {id}", "changes": {{"insertions": {ins}, "deletions": {del}, "files_changed": 1}}}}"#
  )
}

fn fixture_lines() -> String {
  [
    line("c1", "Ann", "ann@acme.com", Y2019, 10, 1),
    line("c2", "Ann", "ann@acme.com", Y2020, 20, 2),
    line("c3", "Bob", "bob@ACME.com", Y2021, 30, 3),
    String::new(),
    line("c4", "Cid", "cid@other.org", Y2019, 10, 1),
    line("c5", "Dee", "dee@other.org", Y2020, 20, 2),
    line("c6", "Cid", "cid@other.org", Y2021, 30, 3),
    line("c7", "Anon", "", Y2021, 5, 0),
  ]
  .join("\n")
}

fn fixture_store() -> MemoryStore {
  MemoryStore::from_json_lines(fixture_lines().as_bytes()).unwrap()
}

fn activity_total(counts: &YearMonthCount) -> i64 {
  counts.values().flat_map(|months| months.values()).sum()
}

fn fixture_groups() -> DomainGroups {
  DomainGroups::from_json_str(r#"{"Acme": ["acme.com"], "Initech": ["initech.com"]}"#).unwrap()
}

#[test]
fn json_lines_report_splits_corporate_and_community() {
  let store = fixture_store();
  assert_eq!(store.len(), 7, "blank line skipped");

  let summary = corporate_report(&store, fixture_groups(), Some("Acme")).unwrap();

  assert_eq!(summary.corporate_group_name, "Acme");
  assert_eq!(summary.total_commits, 7);
  assert_eq!(summary.total_authors, 5);

  // Domain match ignores case; the identity keeps the original spelling.
  assert_eq!(summary.corporate.num_authors, 2);
  assert!(summary.corporate.authors.contains("bob@ACME.com"));
  assert_eq!(summary.corporate.insertions(), 60);
  assert_eq!(summary.corporate.deletions(), 6);
  assert!((summary.corporate.authors_percent - 40.0).abs() < 1e-9);
  assert!((summary.corporate.insertions_percent - 48.0).abs() < 1e-9);

  // Community is everything else, including the author without an email.
  assert_eq!(summary.community.num_authors, 3);
  assert!(summary.community.authors.contains("Anon"));
  assert_eq!(summary.community.insertions(), 65);

  // The two groups partition the repository.
  assert_eq!(
    summary.corporate.insertions() + summary.community.insertions(),
    125
  );
  assert_eq!(
    summary.corporate.num_authors + summary.community.num_authors,
    summary.total_authors
  );

  // Both groups grow every year.
  assert!(summary.correlation.insertions.unwrap() > 0.9);
  assert!(summary.correlation.deletions.unwrap() > 0.9);

  assert_eq!(
    summary.corporate_survival.active_years("ann@acme.com"),
    Some(&[2019, 2020][..])
  );
  assert_eq!(
    summary.community_survival.active_years("cid@other.org"),
    Some(&[2019, 2021][..])
  );
}

#[test]
fn deterministic_output_across_runs() {
  let s1 = corporate_report(&fixture_store(), fixture_groups(), Some("Acme")).unwrap();
  let s2 = corporate_report(&fixture_store(), fixture_groups(), Some("Acme")).unwrap();
  assert_eq!(
    serde_json::to_string(&s1).unwrap(),
    serde_json::to_string(&s2).unwrap(),
    "Same inputs must produce identical JSON output"
  );
  assert_eq!(s1.to_string(), s2.to_string());
}

#[test]
fn sqlite_store_gives_the_same_report_as_json_lines() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("commits.db");
  {
    let mut db = SqliteStore::open(&path).unwrap();
    db.add_commits(&fixture_store().into_commits()).unwrap();
  }
  let db = SqliteStore::open(&path).unwrap();
  assert_eq!(db.commit_count().unwrap(), 7);

  let from_db = corporate_report(&db, fixture_groups(), Some("Acme")).unwrap();
  let from_lines = corporate_report(&fixture_store(), fixture_groups(), Some("Acme")).unwrap();
  assert_eq!(
    serde_json::to_value(&from_db).unwrap(),
    serde_json::to_value(&from_lines).unwrap()
  );
}

#[test]
fn single_year_history_has_undefined_correlation() {
  let lines = [
    line("1", "Ann", "ann@acme.com", Y2021, 10, 1),
    line("2", "Cid", "cid@other.org", Y2021, 3, 4),
  ]
  .join("\n");
  let store = MemoryStore::from_json_lines(lines.as_bytes()).unwrap();
  let summary = corporate_report(&store, fixture_groups(), Some("Acme")).unwrap();

  assert_eq!(summary.correlation.insertions, None);
  assert_eq!(summary.correlation.deletions, None);
  assert_eq!(summary.correlation.authors, None);

  let json = serde_json::to_value(&summary).unwrap();
  assert!(json["correlation"]["insertions"].is_null());
  assert!(summary.to_string().contains("insertions:\tundefined"));
}

#[test]
fn unconfigured_corporate_group_is_empty_and_named_groups_stay_out_of_community() {
  let summary = corporate_report(&fixture_store(), fixture_groups(), Some("Globex")).unwrap();
  assert_eq!(summary.corporate.num_authors, 0);
  assert_eq!(summary.corporate.insertions(), 0);
  // Community is everyone outside every named group, not outside Globex.
  assert_eq!(summary.community.num_authors, 3);
  assert!(!summary.community.authors.contains("ann@acme.com"));
  assert!(!summary.community.authors.contains("bob@ACME.com"));
  assert_eq!(summary.community.insertions(), 65);
  assert_eq!(
    activity_total(&summary.community_activity.insertions),
    summary.community.insertions()
  );
  assert_eq!(summary.correlation.insertions, None, "corporate series is all zero");
}

#[test]
fn activity_views_agree_with_group_totals() {
  let summary = corporate_report(&fixture_store(), fixture_groups(), Some("Acme")).unwrap();
  assert_eq!(
    activity_total(&summary.corporate_activity.insertions),
    summary.corporate.insertions()
  );
  assert_eq!(
    activity_total(&summary.community_activity.deletions),
    summary.community.deletions()
  );
}

#[test]
fn domain_groups_report_lists_groups_and_unknown() {
  let mut report = DomainGroupsReport::new(&fixture_groups());
  report.generate_from_store(&fixture_store()).unwrap();

  let groups = report.domain_groups();
  assert_eq!(groups[0].name, "unknown");
  assert_eq!(groups[0].author_count, 3);
  assert_eq!(groups[1].name, "Acme");
  assert_eq!(groups[1].domain_counts.get("acme.com"), Some(&2));
  assert!(groups.iter().all(|g| g.name != "Initech"));

  assert!((report.group_percentage_of_total("Acme") - 40.0).abs() < 1e-9);
  assert_eq!(report.group_data("unknown"), report.unknown_group_data());

  let text = report.to_string();
  assert!(text.contains("Total repository authors: 5"));
  assert!(text.contains("\"Acme\""));
}

#[test]
fn domain_summary_matches_whole_domain_only() {
  let mut db = SqliteStore::open_in_memory().unwrap();
  db.add_commits(&fixture_store().into_commits()).unwrap();
  db.add_commits(
    &MemoryStore::from_json_lines(line("x1", "Eve", "eve@notacme.com", Y2020, 99, 9).as_bytes())
      .unwrap()
      .into_commits(),
  )
  .unwrap();

  let acme = domain_summary(&db, "acme.com").unwrap();
  assert_eq!(acme.num_commits, 3);
  assert_eq!(acme.authors.len(), 2);
  assert_eq!(acme.changes.insertions(), 60);

  let memory = domain_summary(&fixture_store(), "ACME.com").unwrap();
  assert_eq!(memory, acme);
}

#[test]
fn malformed_commit_line_reports_its_position() {
  let input = format!("{}\n{{\"id\": 5}}\n", line("1", "Ann", "ann@acme.com", Y2019, 1, 1));
  match MemoryStore::from_json_lines(input.as_bytes()) {
    Err(StoreError::JsonLine { line, .. }) => assert_eq!(line, 2),
    other => panic!("expected a json line error, got {:?}", other.map(|s| s.len())),
  }
}

#[test]
fn store_queries_agree_between_backends() {
  let memory = fixture_store();
  let mut db = SqliteStore::open_in_memory().unwrap();
  db.add_commits(&memory.commits().unwrap()).unwrap();

  for identity in ["ann@acme.com", "Anon", "nobody@nowhere.net"] {
    let mut a: Vec<String> = memory.author_commits(identity).unwrap().into_iter().map(|c| c.id).collect();
    let mut b: Vec<String> = db.author_commits(identity).unwrap().into_iter().map(|c| c.id).collect();
    a.sort();
    b.sort();
    assert_eq!(a, b, "author query for {}", identity);
  }
}

#[test]
fn invalid_domain_groups_are_rejected() {
  assert!(DomainGroups::from_json_str(r#"{"Acme": ["ann@acme.com"]}"#).is_err());
  assert!(DomainGroups::from_json_str(r#"{"": ["acme.com"]}"#).is_err());
  assert!(DomainGroups::from_json_str("[1, 2]").is_err());
}
