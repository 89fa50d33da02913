//! Configuration values shared by the CLI, the XML loader and the pipeline.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::fs_ops::TransferMode;
use crate::layout::{GroupBy, NamingPolicy};
use crate::media::ExtensionSet;

/// Console/file verbosity as users spell it.
///
/// Maps onto tracing levels in the binary: quiet = errors only, normal = one line per
/// relocated file, info = per-extractor decisions, debug = everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Quiet,
    #[default]
    Normal,
    Info,
    Debug,
}

impl LogLevel {
    /// Case-insensitive; accepts a few common aliases ("error", "verbose", "trace").
    pub fn parse(s: &str) -> Option<Self> {
        let level = match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => LogLevel::Quiet,
            "normal" => LogLevel::Normal,
            "info" | "verbose" | "detailed" => LogLevel::Info,
            "debug" | "trace" => LogLevel::Debug,
            _ => return None,
        };
        Some(level)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}' (expected quiet, normal, info or debug)"))
    }
}

/// Runtime configuration for a sort run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Tree the media is collected from
    pub source_dir: PathBuf,
    /// Library root the dated tree is built under
    pub dest_dir: PathBuf,
    /// Directory granularity under dest_dir
    pub group_by: GroupBy,
    /// Keep original names or rename to the capture timestamp
    pub naming: NamingPolicy,
    /// Move (rename) or copy
    pub transfer: TransferMode,
    /// Supported extensions; anything else is skipped silently
    pub extensions: ExtensionSet,
    /// Remove directories emptied by the run (move mode only)
    pub prune_empty_dirs: bool,
    /// If true, log decisions but do not modify the filesystem
    pub dry_run: bool,
    /// Skip the destination run lock
    pub disable_locks: bool,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::new(),
            dest_dir: PathBuf::new(),
            group_by: GroupBy::default(),
            naming: NamingPolicy::default(),
            transfer: TransferMode::default(),
            extensions: ExtensionSet::default(),
            prune_empty_dirs: true,
            dry_run: false,
            disable_locks: false,
            log_level: LogLevel::Normal,
            log_file: None,
        }
    }
}

impl Config {
    /// Construct a Config with explicit roots; other fields use defaults.
    pub fn new(source_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            ..Default::default()
        }
    }
}
