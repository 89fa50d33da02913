//! Typed error definitions for photo_sort.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::path::PathBuf;
use thiserror::Error;

/// Why a date could not be derived for a single file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no embedded capture date")]
    NoMetadata,

    #[error("malformed embedded timestamp '{0}'")]
    MalformedTimestamp(String),

    #[error("no date found in file name")]
    NotExtractable,

    #[error("date could not be extracted from '{}'", .path.display())]
    Exhausted { path: PathBuf },
}

/// Run-level failures. Only these reach the process boundary.
#[derive(Debug, Error)]
pub enum PhotoSortError {
    #[error("source directory invalid: {reason}")]
    SourceInvalid { reason: String },

    #[error("destination directory invalid: {reason}")]
    DestinationInvalid { reason: String },

    #[error("source '{}' and destination '{}' overlap: {reason}", .src.display(), .dest.display())]
    OverlappingRoots {
        src: PathBuf,
        dest: PathBuf,
        reason: &'static str,
    },

    #[error("cannot read source tree at {}: {source}", .path.display())]
    WalkFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("another photo_sort run holds the lock on {}", .0.display())]
    Locked(PathBuf),

    #[error("no free name for {} after {tries} attempts", .path.display())]
    CollisionSpaceExhausted { path: PathBuf, tries: u32 },
}

impl PhotoSortError {
    /// Stable numeric code for logs/tests.
    pub fn code(&self) -> u16 {
        match self {
            PhotoSortError::SourceInvalid { .. } => 10,
            PhotoSortError::DestinationInvalid { .. } => 11,
            PhotoSortError::OverlappingRoots { .. } => 12,
            PhotoSortError::WalkFailed { .. } => 20,
            PhotoSortError::Locked(_) => 30,
            PhotoSortError::CollisionSpaceExhausted { .. } => 40,
        }
    }
}
