//! Config validation logic.
//! Verifies the source and destination roots exist, are readable directories and
//! do not overlap in a way that would make the run chase its own output.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::errors::PhotoSortError;

use super::types::Config;

/// Validate both roots and replace them with their canonical forms.
///
/// Nothing is created or touched; every failure here happens before any file moves.
pub fn validate_and_normalize(cfg: &mut Config) -> Result<(), PhotoSortError> {
    let src = check_dir(&cfg.source_dir, "source")
        .map_err(|reason| PhotoSortError::SourceInvalid { reason })?;
    let dest = check_dir(&cfg.dest_dir, "destination")
        .map_err(|reason| PhotoSortError::DestinationInvalid { reason })?;

    if src == dest {
        error!(path = %src.display(), "source and destination are the same directory");
        return Err(PhotoSortError::OverlappingRoots {
            src,
            dest,
            reason: "they resolve to the same directory",
        });
    }
    if dest.starts_with(&src) {
        error!(src = %src.display(), dest = %dest.display(), "destination inside source");
        return Err(PhotoSortError::OverlappingRoots {
            src,
            dest,
            reason: "the destination must not be inside the source",
        });
    }

    info!(
        "Config validated: source='{}' dest='{}' group_by={} naming={} transfer={}",
        src.display(),
        dest.display(),
        cfg.group_by,
        cfg.naming,
        cfg.transfer
    );
    cfg.source_dir = src;
    cfg.dest_dir = dest;
    Ok(())
}

/// Existence, type and readability; returns the canonical path.
fn check_dir(path: &Path, name: &str) -> Result<PathBuf, String> {
    if path.as_os_str().is_empty() || path.to_string_lossy().trim().is_empty() {
        error!("{name} directory is not specified");
        return Err(format!("{name} directory is not specified"));
    }
    let meta = fs::metadata(path).map_err(|e| {
        error!("{name} directory does not exist: {}", path.display());
        format!("{name} directory '{}' does not exist: {e}", path.display())
    })?;
    if !meta.is_dir() {
        error!("{name} is not a directory: {}", path.display());
        return Err(format!("{name} directory '{}' is not a directory", path.display()));
    }
    fs::read_dir(path).map_err(|e| {
        format!("cannot read {name} directory '{}': {e}", path.display())
    })?;
    debug!("{name} readable: {}", path.display());
    dunce::canonicalize(path).map_err(|e| format!("cannot resolve {name} directory '{}': {e}", path.display()))
}
