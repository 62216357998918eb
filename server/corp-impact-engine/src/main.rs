//! Binary entrypoint.
//!
//! - `ingest`: load commit JSON lines into a SQLite commit table.
//! - `report`: corporate vs community report over a commit table or JSON lines.
//! - `groups`: per-group author counts with their domain breakdown.
//! - `domain`: totals for a single email domain.
//!
//! Commits come from `--db` when given, otherwise from `--commits` or stdin,
//! one JSON object per line. Logs go to stderr (`RUST_LOG`, default `info`).

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use corp_impact_engine::domain_groups::domain_summary;
use corp_impact_engine::{
  corporate_report, CommitStore, DomainGroups, DomainGroupsReport, MemoryStore, SqliteStore,
};

#[derive(Parser, Debug)]
#[command(name = "corp-impact", version, about = "Corporate impact statistics over commit history")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Load commit JSON lines into a SQLite database
  Ingest {
    /// Database file, created if missing
    #[arg(long)]
    db: PathBuf,
    /// JSON lines file (stdin when omitted)
    #[arg(long)]
    commits: Option<PathBuf>,
  },
  /// Compare the corporate group with everyone else
  Report {
    #[command(flatten)]
    input: Input,
    /// JSON object mapping group name to a list of email domains
    #[arg(long)]
    domain_groups: PathBuf,
    /// Group treated as corporate (default "Corporate")
    #[arg(long)]
    corporate_group: Option<String>,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
  },
  /// Author counts per configured group
  Groups {
    #[command(flatten)]
    input: Input,
    #[arg(long)]
    domain_groups: PathBuf,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
  },
  /// Totals for one email domain
  Domain {
    #[command(flatten)]
    input: Input,
    domain: String,
  },
}

#[derive(Args, Debug)]
struct Input {
  /// SQLite database written by `ingest`
  #[arg(long, conflicts_with = "commits")]
  db: Option<PathBuf>,
  /// JSON lines file (stdin when neither this nor --db is given)
  #[arg(long)]
  commits: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
  Text,
  Json,
}

fn main() -> Result<()> {
  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(io::stderr))
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let cli = Cli::parse();
  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());

  match cli.command {
    Command::Ingest { db, commits } => {
      let memory = read_commits(commits.as_deref())?;
      let mut store =
        SqliteStore::open(&db).with_context(|| format!("opening {}", db.display()))?;
      let added = store.add_commits(&memory.into_commits())?;
      info!(added, total = store.commit_count()?, db = %db.display(), "ingest complete");
    }
    Command::Report {
      input,
      domain_groups,
      corporate_group,
      format,
    } => {
      let groups = load_groups(&domain_groups)?;
      let store = open_store(&input)?;
      let summary = corporate_report(&*store, groups, corporate_group.as_deref())?;
      match format {
        Format::Text => write!(out, "{}", summary)?,
        Format::Json => write_json(&mut out, &summary)?,
      }
    }
    Command::Groups {
      input,
      domain_groups,
      format,
    } => {
      let groups = load_groups(&domain_groups)?;
      let store = open_store(&input)?;
      let mut report = DomainGroupsReport::new(&groups);
      report.generate_from_store(&*store)?;
      match format {
        Format::Text => write!(out, "{}", report)?,
        Format::Json => write_json(&mut out, &report.domain_groups())?,
      }
    }
    Command::Domain { input, domain } => {
      let store = open_store(&input)?;
      let rollup = domain_summary(&*store, &domain)?;
      write_json(&mut out, &rollup)?;
    }
  }

  out.flush()?;
  Ok(())
}

fn load_groups(path: &Path) -> Result<DomainGroups> {
  DomainGroups::from_path(path).with_context(|| format!("loading domain groups from {}", path.display()))
}

fn read_commits(path: Option<&Path>) -> Result<MemoryStore> {
  let store = match path {
    Some(path) => {
      let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
      MemoryStore::from_json_lines(BufReader::new(file))
        .with_context(|| format!("reading commits from {}", path.display()))?
    }
    None => MemoryStore::from_json_lines(io::stdin().lock()).context("reading commits from stdin")?,
  };
  info!(commits = store.len(), "loaded commits");
  Ok(store)
}

fn open_store(input: &Input) -> Result<Box<dyn CommitStore>> {
  match &input.db {
    Some(db) => {
      let store = SqliteStore::open(db).with_context(|| format!("opening {}", db.display()))?;
      Ok(Box::new(store))
    }
    None => Ok(Box::new(read_commits(input.commits.as_deref())?)),
  }
}

fn write_json(out: &mut impl Write, value: &impl serde::Serialize) -> Result<()> {
  serde_json::to_writer_pretty(&mut *out, value)?;
  writeln!(out)?;
  Ok(())
}
