//! Capture-date extraction.
//!
//! Extractors are tried in a fixed priority order by [`ExtractionChain`]:
//! embedded metadata first, then the file name. Extractors only read through
//! the borrowed handle; the caller opens and closes it.

pub mod filename;
pub mod metadata;

use std::fs::File;
use std::sync::Arc;
use tracing::debug;

use crate::errors::ExtractError;
use crate::media::MediaFile;
use crate::timestamp::CapturedTimestamp;

pub use filename::FilenameDateExtractor;
pub use metadata::{ExifDecoder, MetadataDateExtractor, MetadataDecoder, MetadataFields};

/// One source of capture dates.
pub trait DateExtractor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn extract(&self, media: &MediaFile, file: &File) -> Result<CapturedTimestamp, ExtractError>;
}

/// Ordered list of extractors; the first success wins.
pub struct ExtractionChain {
    extractors: Vec<Box<dyn DateExtractor>>,
}

impl ExtractionChain {
    /// Metadata (through `decoder`) then file name.
    pub fn new(decoder: Arc<dyn MetadataDecoder>) -> Self {
        Self {
            extractors: vec![
                Box::new(MetadataDateExtractor::new(decoder)),
                Box::new(FilenameDateExtractor),
            ],
        }
    }

    /// Chain backed by the EXIF decoder.
    pub fn with_exif() -> Self {
        Self::new(Arc::new(ExifDecoder))
    }

    pub fn from_extractors(extractors: Vec<Box<dyn DateExtractor>>) -> Self {
        Self { extractors }
    }

    pub fn extract(&self, media: &MediaFile, file: &File) -> Result<CapturedTimestamp, ExtractError> {
        for extractor in &self.extractors {
            match extractor.extract(media, file) {
                Ok(ts) => {
                    debug!(path = %media.path().display(), extractor = extractor.name(), %ts, "capture date resolved");
                    return Ok(ts);
                }
                Err(reason) => {
                    debug!(path = %media.path().display(), extractor = extractor.name(), %reason, "extractor gave up");
                }
            }
        }
        Err(ExtractError::Exhausted {
            path: media.path().to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::Path;
    use tempfile::tempdir;

    struct Fixed(Option<&'static str>);

    impl MetadataDecoder for Fixed {
        fn decode(&self, _path: &Path, _file: &File) -> io::Result<Option<MetadataFields>> {
            Ok(self.0.map(|v| {
                let mut m = MetadataFields::new();
                m.insert(metadata::DATE_TIME_ORIGINAL.to_string(), v.to_string());
                m
            }))
        }
    }

    fn run(chain: &ExtractionChain, name: &str) -> Result<CapturedTimestamp, ExtractError> {
        let dir = tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, b"not an image").unwrap();
        let file = File::open(&path).unwrap();
        chain.extract(&MediaFile::new(&path), &file)
    }

    #[test]
    fn metadata_wins_over_filename() {
        let chain = ExtractionChain::new(Arc::new(Fixed(Some("2001:02:03 04:05:06"))));
        let ts = run(&chain, "IMG_20230615_143000.jpg").unwrap();
        assert_eq!(ts, CapturedTimestamp::from_parts(2001, 2, 3, 4, 5, 6).unwrap());
    }

    #[test]
    fn falls_back_to_filename_without_metadata() {
        let chain = ExtractionChain::new(Arc::new(Fixed(None)));
        let ts = run(&chain, "IMG_20230615_143000.jpg").unwrap();
        assert_eq!(ts, CapturedTimestamp::from_parts(2023, 6, 15, 14, 30, 0).unwrap());
    }

    #[test]
    fn malformed_metadata_falls_back_to_filename() {
        let chain = ExtractionChain::new(Arc::new(Fixed(Some("yesterday"))));
        let ts = run(&chain, "clip_20200101.mp4").unwrap();
        assert_eq!(ts, CapturedTimestamp::from_parts(2020, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn exhausted_chain_names_the_file() {
        let chain = ExtractionChain::new(Arc::new(Fixed(None)));
        match run(&chain, "holiday.jpg") {
            Err(ExtractError::Exhausted { path }) => {
                assert_eq!(path.file_name().unwrap(), "holiday.jpg")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_chain_fails() {
        let chain = ExtractionChain::from_extractors(Vec::new());
        assert!(matches!(run(&chain, "IMG_20230615_143000.jpg"), Err(ExtractError::Exhausted { .. })));
    }
}
