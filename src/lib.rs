//! photo_sort library entry point.
//! Sorts photos and videos into a `YYYY/Mon` tree by capture date.
//!
//! Re-exports the primary API so callers can:
//! - Build a Config (or load one from XML)
//! - Run the sort with the EXIF-backed chain, or with a custom `ExtractionChain`
//! - Inspect typed errors and the per-run report

pub mod cli;
pub mod config;
pub mod errors;
pub mod extract;
pub mod fs_ops;
pub mod layout;
pub mod media;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod timestamp;

pub use config::types::{Config, LogLevel};
pub use config::{
    CONFIG_ENV_VAR, default_config_path, default_log_path, load_config, path_has_symlink_ancestor,
    validate_and_normalize,
};
pub use errors::{ExtractError, PhotoSortError};
pub use extract::{DateExtractor, ExifDecoder, ExtractionChain, MetadataDecoder, MetadataFields};
pub use fs_ops::TransferMode;
pub use layout::{GroupBy, NamingPolicy};
pub use media::{ExtensionSet, MediaFile};
pub use pipeline::{FileOutcome, PipelineOptions, RelocationPipeline, RunReport, sort, sort_with};
pub use timestamp::CapturedTimestamp;
