//! Duplicate-name resolution.
//!
//! Policy:
//! - The requested name is used when nothing occupies it.
//! - Otherwise `_n` is appended before the extension: `a.jpg` -> `a_1.jpg`, `a_2.jpg`, ...
//! - Per requested path, `n` only grows during a run, so a suffix handed out once is
//!   never handed out again even if its file disappears later.
//!
//! Notes:
//! - The check and the later move are separate filesystem operations. A concurrent
//!   writer in the same directory can still race us; the run lock guards against a
//!   second photo_sort.

use std::collections::{HashMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::errors::PhotoSortError;

/// Upper bound on suffixes tried for one requested name.
pub const MAX_SUFFIX_TRIES: u32 = 100_000;

#[derive(Debug)]
pub struct SuffixResolver {
    next_suffix: HashMap<PathBuf, u32>,
    /// Paths handed out but never created; only tracked for dry runs.
    reserved: Option<HashSet<PathBuf>>,
    max_tries: u32,
}

impl Default for SuffixResolver {
    fn default() -> Self {
        Self::with_max_tries(MAX_SUFFIX_TRIES)
    }
}

impl SuffixResolver {
    /// For real runs: a relocated file occupies its path, so the filesystem is the record.
    pub fn new() -> Self {
        Self::default()
    }

    /// For dry runs: nothing is created, so handed-out paths are remembered as taken.
    pub fn for_dry_run() -> Self {
        Self {
            reserved: Some(HashSet::new()),
            ..Self::default()
        }
    }

    pub fn with_max_tries(max_tries: u32) -> Self {
        Self {
            next_suffix: HashMap::new(),
            reserved: None,
            max_tries,
        }
    }

    /// Pick a path inside `dir` for `name` that is free right now.
    pub fn resolve(&mut self, dir: &Path, name: &OsStr) -> Result<PathBuf, PhotoSortError> {
        let requested = dir.join(name);
        if !self.is_occupied(&requested) {
            self.reserve(&requested);
            return Ok(requested);
        }

        let (stem, ext) = split_name(name);
        let first = self.next_suffix.get(&requested).copied().unwrap_or(1);
        let mut n = first;
        while n - first < self.max_tries {
            let candidate = dir.join(name_with_suffix(&stem, ext.as_deref(), n));
            if !self.is_occupied(&candidate) {
                self.next_suffix.insert(requested, n + 1);
                self.reserve(&candidate);
                return Ok(candidate);
            }
            if n - first == 3 {
                trace!(name = ?name, dir = %dir.display(), "duplicate: several collisions, still searching");
            }
            n += 1;
        }

        Err(PhotoSortError::CollisionSpaceExhausted {
            path: requested,
            tries: self.max_tries,
        })
    }

    fn reserve(&mut self, path: &Path) {
        if let Some(reserved) = self.reserved.as_mut() {
            reserved.insert(path.to_path_buf());
        }
    }

    fn is_occupied(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling link still counts as an occupant
        self.reserved.as_ref().is_some_and(|r| r.contains(path)) || fs::symlink_metadata(path).is_ok()
    }
}

/// Split into stem and extension, keeping non-UTF-8 bytes intact.
fn split_name(name: &OsStr) -> (OsString, Option<OsString>) {
    let p = Path::new(name);
    let stem = p
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| name.to_os_string());
    (stem, p.extension().map(|e| e.to_os_string()))
}

fn name_with_suffix(stem: &OsStr, ext: Option<&OsStr>, n: u32) -> OsString {
    let mut name = stem.to_os_string();
    name.push(format!("_{n}"));
    if let Some(e) = ext {
        name.push(".");
        name.push(e);
    }
    name
}
