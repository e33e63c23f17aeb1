//! Failure conditions surfaced by the load pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

/// Everything that can stop a file, or the whole run, from loading.
///
/// `DirectoryNotFound` is always run-fatal (the run never starts). The other
/// conditions are per-file; the orchestrator's failure policy decides whether
/// the remaining queue still runs.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("operations directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The substituted file contents do not deserialize into a transaction
    /// request: invalid JSON, an unknown action variant, a missing field.
    #[error("malformed template {}: {source}", .path.display())]
    MalformedTemplate {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The store declined (or never received) the atomic write.
    #[error("store rejected transaction from {}: {source}", .path.display())]
    StoreRejected {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
}
