//! Sequential replay of discovered templates against a store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::discover::discover_templates;
use crate::error::LoadError;
use crate::store::TransactStore;
use crate::template::{apply_table_override, load_template};

/// What to do with the remaining queue after a file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failing file; later files are never touched.
    Abort,
    /// Record the failure and keep going.
    Continue,
}

/// The result of one file: actions applied, or why it failed.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<usize, LoadError>,
}

/// Per-file outcomes for a whole run, in replay order.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub outcomes: Vec<FileOutcome>,
}

impl LoadReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Replays every template under `root` against `store`, one file at a time,
/// in sorted path order.
///
/// Progress goes to stdout (one line per file, one per result); failures are
/// also printed to stderr as they happen. Files are isolated: a failure
/// never corrupts another file's transaction, and `policy` decides whether
/// the rest of the queue still runs. The only `Err` here is a run that
/// cannot start at all; per-file failures live in the report.
pub fn run_load(
    root: &Path,
    table_override: Option<&str>,
    vars: &BTreeMap<String, String>,
    store: &impl TransactStore,
    policy: FailurePolicy,
) -> Result<LoadReport, LoadError> {
    let templates = discover_templates(root)?;
    info!(
        root = %root.display(),
        files = templates.len(),
        "starting load"
    );

    let mut report = LoadReport::default();
    for path in templates {
        println!("Reading from {}", path.display());
        let result = load_one(&path, table_override, vars, store);
        match &result {
            Ok(count) => println!("{count} statement(s) executed"),
            Err(err) => eprintln!("error: {err}"),
        }
        let failed = result.is_err();
        report.outcomes.push(FileOutcome { path, result });
        if failed && policy == FailurePolicy::Abort {
            break;
        }
    }

    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "load finished"
    );
    Ok(report)
}

fn load_one(
    path: &Path,
    table_override: Option<&str>,
    vars: &BTreeMap<String, String>,
    store: &impl TransactStore,
) -> Result<usize, LoadError> {
    let mut request = load_template(path, vars)?;
    apply_table_override(&mut request, table_override);
    store
        .transact_write(&request)
        .map_err(|source| LoadError::StoreRejected {
            path: path.to_path_buf(),
            source,
        })
}
