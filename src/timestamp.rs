//! Capture timestamps and the strict textual layouts they are parsed from.
//!
//! chrono's `%Y`/`%m` parsers accept variable widths ("2023615" parses as a date),
//! so every layout carries a shape mask that the input must match exactly before
//! chrono is asked to interpret it. A digit of the wrong count fails here instead
//! of being silently truncated.

use chrono::{Datelike, NaiveDateTime, Timelike};
use std::fmt;

/// A complete calendar date-time recovered by one extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CapturedTimestamp(NaiveDateTime);

impl CapturedTimestamp {
    pub fn new(dt: NaiveDateTime) -> Self {
        Self(dt)
    }

    /// Build from individual fields; `None` for an invalid calendar value.
    pub fn from_parts(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        chrono::NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, min, sec))
            .map(Self)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    /// Three-letter English month name ("Jan" .. "Dec").
    pub fn month_abbrev(&self) -> String {
        self.0.format("%b").to_string()
    }

    /// Canonical file stem: `YYYY-MM-DD_HHMMSS`.
    pub fn canonical_stem(&self) -> String {
        self.0.format("%Y-%m-%d_%H%M%S").to_string()
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for CapturedTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// A fixed textual layout. `shape` uses `#` for "exactly one ASCII digit" and any
/// other character as a literal that must match verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub shape: &'static str,
    pub format: &'static str,
    pub has_time: bool,
}

/// EXIF `DateTimeOriginal` layout: `YYYY:MM:DD HH:MM:SS`.
pub const EXIF_DATE_TIME: Layout = Layout {
    shape: "####:##:## ##:##:##",
    format: "%Y:%m:%d %H:%M:%S",
    has_time: true,
};

/// Compact camera layout: `YYYYMMDD_HHMMSS`.
pub const COMPACT_DATE_TIME: Layout = Layout {
    shape: "########_######",
    format: "%Y%m%d_%H%M%S",
    has_time: true,
};

/// Canonical stem (`YYYY-MM-DD_HHMMSS`) after its separators were normalised to `_`.
pub const CANONICAL_DATE_TIME: Layout = Layout {
    shape: "####_##_##_######",
    format: "%Y_%m_%d_%H%M%S",
    has_time: true,
};

/// Compact date only: `YYYYMMDD`. Time is midnight.
pub const COMPACT_DATE: Layout = Layout {
    shape: "########",
    format: "%Y%m%d",
    has_time: false,
};

fn matches_shape(input: &str, shape: &str) -> bool {
    input.len() == shape.len()
        && input
            .bytes()
            .zip(shape.bytes())
            .all(|(c, s)| if s == b'#' { c.is_ascii_digit() } else { c == s })
}

impl Layout {
    /// Parse `input` strictly against this layout.
    pub fn parse(&self, input: &str) -> Option<CapturedTimestamp> {
        if !matches_shape(input, self.shape) {
            return None;
        }
        if self.has_time {
            NaiveDateTime::parse_from_str(input, self.format)
                .ok()
                .map(CapturedTimestamp)
        } else {
            chrono::NaiveDate::parse_from_str(input, self.format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(CapturedTimestamp)
        }
    }
}
