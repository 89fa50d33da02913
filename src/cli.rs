//! CLI definition and parsing.
//! Defines Cli (global logging flags plus subcommands) and provides parse().
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - Flags left unset keep whatever the XML config (or the built-in default) says.

use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::fs_ops::TransferMode;
use crate::layout::{GroupBy, NamingPolicy};
use crate::media::MOTION_PHOTO_EXTENSION;

/// Sort photos and videos into a dated directory tree.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Sort photos and videos into a YYYY/Mon tree by capture date")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, global = true, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<LogLevel>,

    /// Emit logs in structured JSON.
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Also append logs to this file.
    #[arg(long, global = true, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Relocate every datable media file from the source tree into the library.
    Sort(SortArgs),
    /// Dump the embedded metadata fields of one file.
    Exif {
        #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
    /// Print where photo_sort looks for its config file, then exit.
    PrintConfig,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SortArgs {
    /// Directory tree to collect media from.
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub src_dir: Option<PathBuf>,

    /// Library root the dated tree is built under.
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub dest_dir: Option<PathBuf>,

    /// Directory granularity: year, month or day.
    #[arg(long, value_name = "LEVEL")]
    pub group_by: Option<GroupBy>,

    /// Keep original file names (preserve) or rename to the capture time (canonical).
    #[arg(long, value_name = "POLICY")]
    pub naming: Option<NamingPolicy>,

    /// Copy files instead of moving them; the source tree is left untouched.
    #[arg(long)]
    pub copy: bool,

    /// Also sort `.MP` motion-photo files.
    #[arg(long)]
    pub include_mp: bool,

    /// Do not remove directories emptied by the run.
    #[arg(long)]
    pub keep_empty_dirs: bool,

    /// Log what would happen, but do not modify files or directories.
    #[arg(long, help = "Show what would be done, but do not modify files/directories")]
    pub dry_run: bool,

    /// Skip the destination run lock (for filesystems where flock fails).
    #[arg(long, help = "Disable the destination run lock (use for NFS/network shares)")]
    pub disable_locks: bool,
}

impl Cli {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(path) = &self.log_file {
            cfg.log_file = Some(path.clone());
        }
        if let Command::Sort(args) = &self.command {
            args.apply_overrides(cfg);
        }
    }
}

impl SortArgs {
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(src) = &self.src_dir {
            cfg.source_dir = src.clone();
        }
        if let Some(dest) = &self.dest_dir {
            cfg.dest_dir = dest.clone();
        }
        if let Some(g) = self.group_by {
            cfg.group_by = g;
        }
        if let Some(n) = self.naming {
            cfg.naming = n;
        }
        if self.copy {
            cfg.transfer = TransferMode::Copy;
        }
        if self.include_mp {
            cfg.extensions = cfg.extensions.with(MOTION_PHOTO_EXTENSION);
        }
        if self.keep_empty_dirs {
            cfg.prune_empty_dirs = false;
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if self.disable_locks {
            cfg.disable_locks = true;
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
