//! Relocation pipeline.
//!
//! Walks the source tree one file at a time: filter by extension, date the file,
//! pick a collision-free destination, move it. Per-file problems are logged and
//! the file stays where it is; only an unreadable source tree stops the walk.
//! Directories emptied by the run are pruned once the walk is done.

use anyhow::Result;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{Config, validate_and_normalize};
use crate::errors::{ExtractError, PhotoSortError};
use crate::extract::ExtractionChain;
use crate::fs_ops::{
    SuffixResolver, TransferMode, acquire_run_lock, io_error_with_help, prune_empty_dirs, transfer,
};
use crate::layout::{GroupBy, NamingPolicy, destination_dir, destination_name};
use crate::media::{ExtensionSet, MediaFile};

/// Per-run knobs taken from [`Config`].
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub group_by: GroupBy,
    pub naming: NamingPolicy,
    pub transfer: TransferMode,
    pub extensions: ExtensionSet,
    pub prune_empty_dirs: bool,
    pub dry_run: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for PipelineOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            group_by: cfg.group_by,
            naming: cfg.naming,
            transfer: cfg.transfer,
            extensions: cfg.extensions.clone(),
            prune_empty_dirs: cfg.prune_empty_dirs,
            dry_run: cfg.dry_run,
        }
    }
}

/// What happened to one file.
#[derive(Debug)]
pub enum FileOutcome {
    /// Extension not in the allow-list; silently left alone.
    Unsupported,
    /// No extractor produced a date; left in place.
    Undated(ExtractError),
    /// Open, mkdir, naming or transfer failed; left in place.
    Failed(anyhow::Error),
    /// Moved/copied (or, in a dry run, would be) to this path.
    Relocated(PathBuf),
}

/// Totals for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub relocated: usize,
    pub unsupported: usize,
    pub undated: usize,
    pub failed: usize,
    pub pruned_dirs: usize,
}

impl RunReport {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Unsupported => self.unsupported += 1,
            FileOutcome::Undated(_) => self.undated += 1,
            FileOutcome::Failed(_) => self.failed += 1,
            FileOutcome::Relocated(_) => self.relocated += 1,
        }
    }
}

pub struct RelocationPipeline {
    chain: ExtractionChain,
    options: PipelineOptions,
}

impl RelocationPipeline {
    pub fn new(chain: ExtractionChain, options: PipelineOptions) -> Self {
        Self { chain, options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Relocate every supported, datable file under `source_root` into `dest_root`.
    ///
    /// Returns `WalkFailed` if the tree cannot be read; files moved before that point
    /// stay moved.
    pub fn process(&self, source_root: &Path, dest_root: &Path) -> Result<RunReport, PhotoSortError> {
        let mut resolver = if self.options.dry_run {
            SuffixResolver::for_dry_run()
        } else {
            SuffixResolver::new()
        };
        let mut report = RunReport::default();

        for entry in WalkDir::new(source_root).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| PhotoSortError::WalkFailed {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| source_root.to_path_buf()),
                source: e,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let outcome = self.process_file(entry.path(), dest_root, &mut resolver);
            report.record(&outcome);
            if let FileOutcome::Relocated(_) = outcome {
                debug!(count = report.relocated, "running total");
            }
        }

        if self.should_prune() {
            let pruned = prune_empty_dirs(source_root);
            report.pruned_dirs = pruned.removed;
            if pruned.failed > 0 {
                warn!(failed = pruned.failed, "some empty directories could not be removed");
            }
        }

        info!(
            relocated = report.relocated,
            unsupported = report.unsupported,
            undated = report.undated,
            failed = report.failed,
            pruned_dirs = report.pruned_dirs,
            dry_run = self.options.dry_run,
            "Processed source tree"
        );
        Ok(report)
    }

    fn should_prune(&self) -> bool {
        self.options.prune_empty_dirs
            && self.options.transfer == TransferMode::Move
            && !self.options.dry_run
    }

    /// Handle one regular file. Never returns an error: the outcome says what happened.
    pub fn process_file(&self, path: &Path, dest_root: &Path, resolver: &mut SuffixResolver) -> FileOutcome {
        let media = MediaFile::new(path);
        if !media.is_supported(&self.options.extensions) {
            debug!(path = %path.display(), "unsupported file type; skipping");
            return FileOutcome::Unsupported;
        }

        // the handle lives only for extraction and is closed before the move
        let dated = match File::open(path) {
            Ok(file) => self.chain.extract(&media, &file),
            Err(e) => {
                let err = io_error_with_help("open", path)(e);
                warn!(path = %path.display(), error = %err, "cannot open file; leaving it in place");
                return FileOutcome::Failed(err);
            }
        };
        let ts = match dated {
            Ok(ts) => ts,
            Err(reason) => {
                warn!(path = %path.display(), %reason, "cannot date file; leaving it in place");
                return FileOutcome::Undated(reason);
            }
        };

        let dest_dir = destination_dir(dest_root, &ts, self.options.group_by);
        if !self.options.dry_run
            && let Err(e) = fs::create_dir_all(&dest_dir)
        {
            let err = io_error_with_help("create destination directory", &dest_dir)(e);
            warn!(path = %path.display(), error = %err, "leaving file in place");
            return FileOutcome::Failed(err);
        }

        let name = destination_name(&media, &ts, self.options.naming);
        let dest = match resolver.resolve(&dest_dir, &name) {
            Ok(p) => p,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "leaving file in place");
                return FileOutcome::Failed(e.into());
            }
        };

        if self.options.dry_run {
            info!(src = %path.display(), dest = %dest.display(), action = %self.options.transfer, %ts, "dry-run");
            return FileOutcome::Relocated(dest);
        }

        match transfer(path, &dest, self.options.transfer) {
            Ok(()) => {
                info!(src = %path.display(), dest = %dest.display(), action = %self.options.transfer, %ts, "Relocated file");
                FileOutcome::Relocated(dest)
            }
            Err(e) => {
                warn!(src = %path.display(), dest = %dest.display(), error = %e, "transfer failed; leaving file in place");
                FileOutcome::Failed(e)
            }
        }
    }
}

/// Validate `cfg`, take the destination lock and run the pipeline with `chain`.
pub fn sort_with(cfg: &mut Config, chain: ExtractionChain) -> Result<RunReport> {
    validate_and_normalize(cfg)?;

    let _lock = if cfg.disable_locks || cfg.dry_run {
        None
    } else {
        Some(acquire_run_lock(&cfg.dest_dir)?)
    };

    let pipeline = RelocationPipeline::new(chain, PipelineOptions::from(&*cfg));
    Ok(pipeline.process(&cfg.source_dir, &cfg.dest_dir)?)
}

/// [`sort_with`] using the EXIF-backed extraction chain.
pub fn sort(cfg: &mut Config) -> Result<RunReport> {
    sort_with(cfg, ExtractionChain::with_exif())
}
