//! Relocating one file.
//! - Move: a single `rename`; no copy fallback, so a cross-device target fails and the
//!   source stays put.
//! - Copy: streamed into a `create_new` temp file beside the destination, given the
//!   source's permissions and modification time (best-effort), then renamed into place.

use anyhow::Result;
use filetime::FileTime;
use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{trace, warn};

use super::helpers::io_error_with_help;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    #[default]
    Move,
    Copy,
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransferMode::Move => "move",
            TransferMode::Copy => "copy",
        })
    }
}

impl FromStr for TransferMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "move" | "mv" => Ok(TransferMode::Move),
            "copy" | "cp" => Ok(TransferMode::Copy),
            _ => Err(format!("invalid transfer mode: '{s}' (expected move or copy)")),
        }
    }
}

pub fn transfer(src: &Path, dest: &Path, mode: TransferMode) -> Result<()> {
    match mode {
        TransferMode::Move => move_file(src, dest),
        TransferMode::Copy => copy_file(src, dest),
    }
}

/// Same-filesystem rename. Content and timestamps are whatever rename keeps.
pub fn move_file(src: &Path, dest: &Path) -> Result<()> {
    fs::rename(src, dest).map_err(io_error_with_help("rename", src))?;

    // Unix: fsync the destination directory to persist the rename (best-effort).
    #[cfg(unix)]
    if let Some(parent) = dest.parent() {
        let _ = File::open(parent).and_then(|d| d.sync_all());
    }
    Ok(())
}

/// Copy via a temp file next to `dest`, then rename it into place.
///
/// The final name only ever holds a complete copy. An existing `dest` is never replaced.
pub fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    let meta = fs::metadata(src).map_err(io_error_with_help("stat source", src))?;
    let tmp = temp_path_for(dest);
    let mut input = File::open(src).map_err(io_error_with_help("open source", src))?;
    let mut output = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp)
        .map_err(io_error_with_help("create temporary file", &tmp))?;

    let copied = io::copy(&mut input, &mut output).and_then(|_| output.sync_all());
    drop(output);
    if let Err(e) = copied {
        let _ = fs::remove_file(&tmp);
        return Err(io_error_with_help("copy into", &tmp)(e));
    }

    apply_source_metadata(&tmp, &meta);

    if fs::symlink_metadata(dest).is_ok() {
        let _ = fs::remove_file(&tmp);
        return Err(io_error_with_help("place copy at", dest)(io::Error::from(
            io::ErrorKind::AlreadyExists,
        )));
    }
    if let Err(e) = move_file(&tmp, dest) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

/// `.<name>.<pid>.part` in the same directory as `dest`.
fn temp_path_for(dest: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(dest.file_name().unwrap_or_default());
    name.push(format!(".{}.part", std::process::id()));
    dest.with_file_name(name)
}

/// Permissions and mtime from the source. Best-effort: failures are logged, the copy stands.
fn apply_source_metadata(path: &Path, meta: &fs::Metadata) {
    if let Err(e) = fs::set_permissions(path, meta.permissions()) {
        warn!(path = %path.display(), error = %e, "failed to copy permissions onto destination");
    }
    match filetime::set_file_mtime(path, FileTime::from_last_modification_time(meta)) {
        Ok(()) => trace!(path = %path.display(), "set mtime on destination"),
        Err(e) => warn!(path = %path.display(), error = %e, "failed to set mtime on destination"),
    }
}
