//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - A missing default file means "use defaults"; a missing explicit file
//!   (`PHOTO_SORT_CONFIG`) or a malformed file is an error.
//!
//! Notes:
//! - Unknown XML fields are rejected to surface typos early.
//! - Directory validation happens elsewhere.

use anyhow::{Context, Result, anyhow};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::{CONFIG_ENV_VAR, default_config_path};
use super::types::{Config, LogLevel};
use crate::fs_ops::TransferMode;
use crate::layout::{GroupBy, NamingPolicy};
use crate::media::{ExtensionSet, MOTION_PHOTO_EXTENSION};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    source_dir: Option<String>,
    dest_dir: Option<String>,
    group_by: Option<String>,
    naming: Option<String>,
    transfer: Option<String>,
    /// Comma separated, e.g. "jpg, heic, mov"
    extensions: Option<String>,
    include_mp: Option<bool>,
    prune_empty_dirs: Option<bool>,
    disable_locks: Option<bool>,
    log_level: Option<String>,
    log_file: Option<String>,
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

// Map XmlConfig -> Config; unset fields keep their defaults.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = non_empty(parsed.source_dir.as_deref()) {
        cfg.source_dir = PathBuf::from(s);
    }
    if let Some(s) = non_empty(parsed.dest_dir.as_deref()) {
        cfg.dest_dir = PathBuf::from(s);
    }
    if let Some(s) = non_empty(parsed.group_by.as_deref()) {
        cfg.group_by = s.parse::<GroupBy>().map_err(|e| anyhow!(e))?;
    }
    if let Some(s) = non_empty(parsed.naming.as_deref()) {
        cfg.naming = s.parse::<NamingPolicy>().map_err(|e| anyhow!(e))?;
    }
    if let Some(s) = non_empty(parsed.transfer.as_deref()) {
        cfg.transfer = s.parse::<TransferMode>().map_err(|e| anyhow!(e))?;
    }
    if let Some(s) = non_empty(parsed.extensions.as_deref()) {
        cfg.extensions = ExtensionSet::parse_list(s);
    }
    if parsed.include_mp.unwrap_or(false) {
        cfg.extensions = cfg.extensions.with(MOTION_PHOTO_EXTENSION);
    }
    if let Some(b) = parsed.prune_empty_dirs {
        cfg.prune_empty_dirs = b;
    }
    if let Some(b) = parsed.disable_locks {
        cfg.disable_locks = b;
    }
    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(|e| anyhow!(e))?;
    }
    if let Some(s) = non_empty(parsed.log_file.as_deref()) {
        cfg.log_file = Some(PathBuf::from(s));
    }
    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in config xml '{}'", path.display()))
}

/// Config from `$PHOTO_SORT_CONFIG` or the default location, or defaults when no
/// default file exists.
pub fn load_config() -> Result<Config> {
    let explicit = env::var_os(CONFIG_ENV_VAR).is_some_and(|v| !v.is_empty());
    let Some(path) = default_config_path() else {
        return Ok(Config::default());
    };
    if !path.exists() {
        if explicit {
            return Err(anyhow!(
                "{} points at '{}', which does not exist",
                CONFIG_ENV_VAR,
                path.display()
            ));
        }
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(Config::default());
    }
    debug!(path = %path.display(), "loading config file");
    load_config_from_xml_path(&path)
}
