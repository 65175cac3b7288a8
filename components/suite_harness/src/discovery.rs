//! Test file discovery
//!
//! Walks the literal prefix of a profile's include pattern below the project
//! root and keeps files whose project-relative path matches the pattern.
//! Adding a file under the profile's test root is enough for it to be picked
//! up.

use crate::error::{HarnessError, HarnessResult};
use std::path::{Path, PathBuf};
use suite_profile::IncludePattern;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Files under `root` selected by `pattern`, relative to `root` and sorted
///
/// A missing test root is not an error; it selects nothing.
pub fn discover(root: &Path, pattern: &IncludePattern) -> HarnessResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(HarnessError::Config(format!(
            "project root {} is not a directory",
            root.display()
        )));
    }

    let base = root.join(pattern.base_dir());
    if !base.is_dir() {
        debug!(dir = %base.display(), "test root does not exist, nothing to run");
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(&base)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry during discovery");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .filter(|relative| pattern.matches_path(relative))
        .collect();

    files.sort();
    debug!(
        pattern = %pattern,
        count = files.len(),
        "discovered test files"
    );
    Ok(files)
}
