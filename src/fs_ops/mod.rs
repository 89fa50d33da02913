//! Filesystem operations: collision-free naming, move/copy, pruning, run lock.

mod duplicate;
mod helpers;
mod lock;
mod prune;
mod transfer;

pub use duplicate::{MAX_SUFFIX_TRIES, SuffixResolver};
pub use helpers::io_error_with_help;
pub use lock::{LOCK_FILE_NAME, RunLock, acquire_run_lock};
pub use prune::{PruneReport, prune_empty_dirs};
pub use transfer::{TransferMode, copy_file, move_file, transfer};
