//! Empty-directory pruning.
//!
//! Directories are visited children-first, so each one is checked only after
//! everything below it has had its chance to go. A directory is removed only
//! when it has zero entries at the moment of the check, and nothing above
//! `root` is ever touched. Failures are logged and counted, never fatal.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PruneReport {
    pub removed: usize,
    pub failed: usize,
}

/// Remove every empty directory under `root`, `root` included.
pub fn prune_empty_dirs(root: &Path) -> PruneReport {
    let mut report = PruneReport::default();

    for entry in WalkDir::new(root).follow_links(false).contents_first(true) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "prune: cannot read directory");
                report.failed += 1;
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let dir = entry.path();
        match is_empty_dir(dir) {
            Ok(true) => match fs::remove_dir(dir) {
                Ok(()) => {
                    debug!(dir = %dir.display(), "removed empty directory");
                    report.removed += 1;
                }
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "prune: failed to remove directory");
                    report.failed += 1;
                }
            },
            Ok(false) => {}
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "prune: failed to list directory");
                report.failed += 1;
            }
        }
    }
    report
}

fn is_empty_dir(dir: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(dir)?.next().is_none())
}
