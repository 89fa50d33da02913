//! Advisory run lock.
//! Holds `.photo_sort.lock` inside the destination root for the duration of a run so a
//! second invocation against the same library fails fast instead of racing on names.
//!
//! Notes:
//! - The lock is released (and the file removed) when the guard is dropped.
//! - Network filesystems may not support advisory locks; `--disable-locks` skips this.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::errors::PhotoSortError;

pub const LOCK_FILE_NAME: &str = ".photo_sort.lock";

/// RAII guard held while the run lock is active.
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Try to take the exclusive lock in `dir` without waiting.
pub fn acquire_run_lock(dir: &Path) -> anyhow::Result<RunLock> {
    let path = dir.join(LOCK_FILE_NAME);
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)
        .map_err(super::helpers::io_error_with_help("open lock file", &path))?;

    match file.try_lock_exclusive() {
        Ok(()) => {
            trace!(path = %path.display(), "run lock acquired");
            Ok(RunLock { file, path })
        }
        Err(e) if e.kind() == io::ErrorKind::WouldBlock || e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => {
            Err(PhotoSortError::Locked(dir.to_path_buf()).into())
        }
        Err(e) => Err(super::helpers::io_error_with_help("lock", &path)(e)),
    }
}
