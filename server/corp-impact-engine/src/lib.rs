//! Corporate Impact Statistics Engine.
//!
//! Classifies commit authors by email domain into configured groups, and
//! compares one "corporate" group with the rest of the contributors
//! ("community"): change totals, distinct authors, yearly series, Pearson
//! correlation of those series, and author survival across years.
//!
//! Single-threaded and synchronous; the commit store is read-only.

pub mod activity;
pub mod changes;
pub mod classify;
pub mod config;
pub mod corporate;
pub mod correlation;
pub mod domain_groups;
pub mod email;
pub mod error;
pub mod group_data;
pub mod sqlite;
pub mod store;
pub mod survival;
pub mod types;
pub mod yearly;

pub use changes::{Changes, LineChanges};
pub use config::{Config, DomainGroups};
pub use corporate::{corporate_report, CorporateReport, CorporateSummary};
pub use domain_groups::DomainGroupsReport;
pub use email::EmailSet;
pub use error::{ConfigError, ReportError, StoreError};
pub use group_data::GroupData;
pub use sqlite::SqliteStore;
pub use store::{CommitStore, MemoryStore};
pub use types::{Commit, Person};
