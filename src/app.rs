//! Application orchestrator.
//! Dispatches the subcommand; `sort` loads/merges config and initializes logging first.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use tracing::{debug, error, info};

use photo_sort::cli::{Cli, Command};
use photo_sort::extract::{ExifDecoder, MetadataDecoder};
use photo_sort::output as out;
use photo_sort::{CONFIG_ENV_VAR, Config, PhotoSortError, default_config_path, load_config};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(cli: Cli) -> Result<()> {
    // Neither command reads the config, so a broken file must not block them
    match &cli.command {
        Command::PrintConfig => {
            print_config_location();
            return Ok(());
        }
        Command::Exif { file } => return dump_metadata(file),
        Command::Sort(_) => {}
    }

    // XML (or defaults), then CLI wins
    let mut cfg = load_config().map_err(|e| {
        out::print_error(&format!("Failed to load config: {e:#}"));
        e
    })?;
    cli.apply_overrides(&mut cfg);

    // Hold the guard until we return so the file appender flushes
    let _guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), cli.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;

    debug!("Starting photo_sort: {:?}", cli);

    run_sort(&mut cfg)
}

fn print_config_location() {
    if let Ok(cfg_env) = std::env::var(CONFIG_ENV_VAR) {
        out::print_info(&format!("Using {CONFIG_ENV_VAR} (explicit):\n  {}\n", cfg_env));
        out::print_info(&format!("To override, unset {CONFIG_ENV_VAR} or set it to another file."));
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!("Default photo_sort config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file exists at that location.");
            } else {
                out::print_info(
                    "No config file exists there; built-in defaults apply. Example:\n\n<config>\n  <source_dir>/path/to/inbox</source_dir>\n  <dest_dir>/path/to/library</dest_dir>\n  <group_by>month</group_by>\n  <log_level>normal</log_level>\n</config>\n",
                );
            }
        }
        None => out::print_error("Could not determine a default config path"),
    }
}

fn run_sort(cfg: &mut Config) -> Result<()> {
    match photo_sort::sort(cfg) {
        Ok(report) => {
            info!(
                source = %cfg.source_dir.display(),
                dest = %cfg.dest_dir.display(),
                "Sort completed"
            );
            out::print_report(&report, cfg.dry_run);
            Ok(())
        }
        Err(e) => {
            if let Some(pe) = e.downcast_ref::<PhotoSortError>() {
                let code = pe.code();
                match pe {
                    PhotoSortError::SourceInvalid { reason } => {
                        error!(code, kind = "source_invalid", %reason, "Configuration rejected")
                    }
                    PhotoSortError::DestinationInvalid { reason } => {
                        error!(code, kind = "destination_invalid", %reason, "Configuration rejected")
                    }
                    PhotoSortError::OverlappingRoots { src, dest, reason } => {
                        error!(code, kind = "overlapping_roots", src = %src.display(), dest = %dest.display(), %reason, "Configuration rejected")
                    }
                    PhotoSortError::WalkFailed { path, source } => {
                        error!(code, kind = "walk_failed", path = %path.display(), error = %source, "Sort aborted")
                    }
                    PhotoSortError::Locked(dir) => {
                        error!(code, kind = "locked", dest = %dir.display(), "Another run is in progress")
                    }
                    _ => error!(code, kind = "sort_error", error = %pe, "Sort failed"),
                }
            } else {
                error!(error = ?e, "Sort failed");
            }
            Err(e)
        }
    }
}

fn dump_metadata(path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("open '{}'", path.display()))?;
    let fields = ExifDecoder
        .decode(path, &file)
        .with_context(|| format!("read metadata from '{}'", path.display()))?;
    match fields {
        Some(fields) => {
            for (key, value) in &fields {
                out::print_user(&format!("{key} = {value}"));
            }
        }
        None => out::print_warn(&format!("No embedded metadata in {}", path.display())),
    }
    Ok(())
}
