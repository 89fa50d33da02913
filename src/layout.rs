//! Destination layout: which directory a dated file lands in and under what name.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::media::MediaFile;
use crate::timestamp::CapturedTimestamp;

/// Directory granularity below the destination root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupBy {
    /// `dest/YYYY`
    Year,
    /// `dest/YYYY/Mon`
    #[default]
    Month,
    /// `dest/YYYY/Mon/DD`
    Day,
}

impl GroupBy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "year" | "y" => Some(GroupBy::Year),
            "month" | "year-month" | "m" => Some(GroupBy::Month),
            "day" | "d" => Some(GroupBy::Day),
            _ => None,
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GroupBy::Year => "year",
            GroupBy::Month => "month",
            GroupBy::Day => "day",
        })
    }
}

impl FromStr for GroupBy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid group-by: '{s}' (expected year, month or day)"))
    }
}

/// How the relocated file is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingPolicy {
    /// Keep the original file name.
    #[default]
    Preserve,
    /// `YYYY-MM-DD_HHMMSS` plus the original extension.
    Canonical,
}

impl NamingPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preserve" | "original" | "keep" => Some(NamingPolicy::Preserve),
            "canonical" | "timestamp" | "date" => Some(NamingPolicy::Canonical),
            _ => None,
        }
    }
}

impl fmt::Display for NamingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NamingPolicy::Preserve => "preserve",
            NamingPolicy::Canonical => "canonical",
        })
    }
}

impl FromStr for NamingPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid naming policy: '{s}' (expected preserve or canonical)"))
    }
}

/// `dest_root/YYYY[/Mon[/DD]]`
pub fn destination_dir(dest_root: &Path, ts: &CapturedTimestamp, group_by: GroupBy) -> PathBuf {
    let mut dir = dest_root.join(ts.year().to_string());
    if matches!(group_by, GroupBy::Month | GroupBy::Day) {
        dir.push(ts.month_abbrev());
    }
    if group_by == GroupBy::Day {
        dir.push(format!("{:02}", ts.day()));
    }
    dir
}

/// File name (before collision resolution) for `media` under `policy`.
pub fn destination_name(media: &MediaFile, ts: &CapturedTimestamp, policy: NamingPolicy) -> OsString {
    match policy {
        NamingPolicy::Preserve => media
            .path()
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from(ts.canonical_stem())),
        NamingPolicy::Canonical => {
            let mut name = OsString::from(ts.canonical_stem());
            if let Some(ext) = media.original_extension() {
                name.push(".");
                name.push(ext);
            }
            name
        }
    }
}
