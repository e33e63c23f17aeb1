//! Template discovery under the operations directory.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::LoadError;

/// Collects every `.json` file under `root`, recursively, sorted by path.
///
/// The sort gives a deterministic replay order regardless of filesystem
/// enumeration order. Non-`.json` files and directories are skipped; an
/// empty result is not an error. A missing or non-directory `root` is
/// `DirectoryNotFound`.
pub fn discover_templates(root: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !root.is_dir() {
        return Err(LoadError::DirectoryNotFound(root.to_path_buf()));
    }

    let mut templates = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|err| LoadError::Io {
            path: err
                .path()
                .map_or_else(|| root.to_path_buf(), Path::to_path_buf),
            source: err
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|ext| ext.to_str()) == Some("json") {
            templates.push(entry.into_path());
        }
    }
    templates.sort();
    Ok(templates)
}
