//! Date recovery from file names.
//!
//! The stem is split on `_` and `-` into tokens, then three finders run in fixed
//! order. Longer date-time windows are tried before single date-only tokens.

use std::fs::File;
use tracing::trace;

use crate::errors::ExtractError;
use crate::media::MediaFile;
use crate::timestamp::{CANONICAL_DATE_TIME, COMPACT_DATE, COMPACT_DATE_TIME, CapturedTimestamp, Layout};

use super::DateExtractor;

/// Layouts tried for a multi-token window.
const DATE_TIME_LAYOUTS: &[Layout] = &[COMPACT_DATE_TIME, CANONICAL_DATE_TIME];

/// A finder maps the token list to an optional timestamp.
pub type Finder = fn(&[&str]) -> Option<CapturedTimestamp>;

/// Finders in priority order.
pub const FINDERS: &[(&str, Finder)] = &[
    ("prefix_shrink", find_prefix_shrink),
    ("alternating_trim", find_alternating_trim),
    ("single_token", find_single_token),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct FilenameDateExtractor;

impl DateExtractor for FilenameDateExtractor {
    fn name(&self) -> &'static str {
        "filename"
    }

    fn extract(&self, media: &MediaFile, _file: &File) -> Result<CapturedTimestamp, ExtractError> {
        date_from_stem(media.stem())
    }
}

/// Run the finder chain over a file stem.
pub fn date_from_stem(stem: &str) -> Result<CapturedTimestamp, ExtractError> {
    let tokens = tokenize(stem);
    if tokens.is_empty() {
        return Err(ExtractError::NotExtractable);
    }
    for (name, finder) in FINDERS {
        if let Some(ts) = finder(&tokens) {
            trace!(stem, finder = *name, %ts, "filename date found");
            return Ok(ts);
        }
    }
    Err(ExtractError::NotExtractable)
}

/// Split on `_`/`-`, dropping empty tokens produced by repeated separators.
pub fn tokenize(stem: &str) -> Vec<&str> {
    stem.split(['_', '-']).filter(|t| !t.is_empty()).collect()
}

fn parse_window(window: &[&str]) -> Option<CapturedTimestamp> {
    let joined = window.join("_");
    DATE_TIME_LAYOUTS.iter().find_map(|layout| layout.parse(&joined))
}

/// `tokens[h..n]`, `tokens[h..n-1]`, ..., `tokens[h..h+1]` as date-time, for `h = 0, 1, ...`.
///
/// The head-0 pass is the classic prefix shrink; later heads let a camera prefix
/// such as `IMG` precede the date-time without degrading to a date-only match.
pub fn find_prefix_shrink(tokens: &[&str]) -> Option<CapturedTimestamp> {
    for head in 0..tokens.len() {
        let mut tail = tokens.len();
        while tail > head {
            if let Some(ts) = parse_window(&tokens[head..tail]) {
                return Some(ts);
            }
            tail -= 1;
        }
    }
    None
}

/// Trim tail, then head, alternately. A single-token window is parsed as a date.
pub fn find_alternating_trim(tokens: &[&str]) -> Option<CapturedTimestamp> {
    let (mut head, mut tail) = (0usize, tokens.len());
    let mut trim_tail = true;
    while head < tail {
        let window = &tokens[head..tail];
        let found = if window.len() == 1 {
            COMPACT_DATE.parse(window[0])
        } else {
            parse_window(window)
        };
        if found.is_some() {
            return found;
        }
        if trim_tail {
            tail -= 1;
        } else {
            head += 1;
        }
        trim_tail = !trim_tail;
    }
    None
}

/// First token that is a compact date.
pub fn find_single_token(tokens: &[&str]) -> Option<CapturedTimestamp> {
    tokens.iter().find_map(|t| COMPACT_DATE.parse(t))
}
