//! Media file identity and the extension allow-list.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Extensions accepted by default (upper-case, no leading dot).
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "JPG", "JPEG", "PNG", "GIF", "TIFF", "BMP", "HEIC", "MP4", "MOV", "AVI", "MKV", "WEBM", "FLV",
    "WMV", "MPG", "MPEG", "3GP", "3G2",
];

/// Motion-photo container extension, opt-in only.
pub const MOTION_PHOTO_EXTENSION: &str = "MP";

/// Immutable set of supported extensions, normalised to upper-case without a dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet(BTreeSet<String>);

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().copied())
    }
}

impl ExtensionSet {
    pub fn new<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            exts.into_iter()
                .map(|e| normalize_extension(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
        )
    }

    /// Parse a comma/whitespace separated list ("jpg, .mov mp4").
    pub fn parse_list(s: &str) -> Self {
        Self::new(s.split(|c: char| c == ',' || c.is_whitespace()))
    }

    /// Copy of this set with one more extension.
    pub fn with(&self, ext: &str) -> Self {
        let mut set = self.0.clone();
        let ext = normalize_extension(ext);
        if !ext.is_empty() {
            set.insert(ext);
        }
        Self(set)
    }

    pub fn contains(&self, ext: &str) -> bool {
        self.0.contains(&normalize_extension(ext))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_uppercase()
}

/// A file discovered in the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    path: PathBuf,
    extension: String,
    stem: String,
}

impl MediaFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_uppercase())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            extension,
            stem,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Upper-case extension without the dot; empty when the name has none.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Extension exactly as written in the original name, if any.
    pub fn original_extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
    }

    pub fn is_supported(&self, allowed: &ExtensionSet) -> bool {
        !self.extension.is_empty() && allowed.contains(&self.extension)
    }
}
