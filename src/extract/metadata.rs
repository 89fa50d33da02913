//! Embedded-metadata capture dates.
//!
//! Decoding is behind [`MetadataDecoder`] so tests can substitute a fake; the
//! production decoder reads EXIF with kamadak-exif.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::ExtractError;
use crate::media::MediaFile;
use crate::timestamp::{CapturedTimestamp, EXIF_DATE_TIME};

use super::DateExtractor;

/// Field consulted for the capture date.
pub const DATE_TIME_ORIGINAL: &str = "DateTimeOriginal";

/// Metadata fields keyed by tag name.
pub type MetadataFields = BTreeMap<String, String>;

/// External metadata capability.
///
/// `Ok(None)` means the file carries no metadata the decoder understands;
/// `Err` is reserved for I/O failures while reading.
pub trait MetadataDecoder: Send + Sync {
    fn decode(&self, path: &Path, file: &File) -> io::Result<Option<MetadataFields>>;
}

/// EXIF decoder for JPEG/TIFF/HEIF/PNG/WebP containers.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifDecoder;

impl MetadataDecoder for ExifDecoder {
    fn decode(&self, path: &Path, file: &File) -> io::Result<Option<MetadataFields>> {
        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(0))?;
        let parsed = exif::Reader::new().read_from_container(&mut reader);
        // leave the shared handle where we found it
        reader.seek(SeekFrom::Start(0))?;

        let exif = match parsed {
            Ok(exif) => exif,
            Err(exif::Error::Io(e)) => return Err(e),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no decodable EXIF");
                return Ok(None);
            }
        };

        let mut fields = MetadataFields::new();
        for field in exif.fields() {
            if field.ifd_num != exif::In::PRIMARY {
                continue;
            }
            let value = match field.value {
                exif::Value::Ascii(ref parts) if !parts.is_empty() => {
                    String::from_utf8_lossy(&parts[0]).trim_end_matches('\0').trim().to_string()
                }
                _ => field.display_value().with_unit(&exif).to_string(),
            };
            fields.entry(field.tag.to_string()).or_insert(value);
        }
        Ok(if fields.is_empty() { None } else { Some(fields) })
    }
}

/// Reads `DateTimeOriginal` through a [`MetadataDecoder`].
#[derive(Clone)]
pub struct MetadataDateExtractor {
    decoder: Arc<dyn MetadataDecoder>,
}

impl MetadataDateExtractor {
    pub fn new(decoder: Arc<dyn MetadataDecoder>) -> Self {
        Self { decoder }
    }
}

impl DateExtractor for MetadataDateExtractor {
    fn name(&self) -> &'static str {
        "metadata"
    }

    fn extract(&self, media: &MediaFile, file: &File) -> Result<CapturedTimestamp, ExtractError> {
        let fields = match self.decoder.decode(media.path(), file) {
            Ok(Some(fields)) => fields,
            Ok(None) => return Err(ExtractError::NoMetadata),
            Err(e) => {
                warn!(path = %media.path().display(), error = %e, "metadata read failed");
                return Err(ExtractError::NoMetadata);
            }
        };
        date_from_fields(&fields)
    }
}

/// Pick and parse the capture date out of a decoded field map.
pub fn date_from_fields(fields: &MetadataFields) -> Result<CapturedTimestamp, ExtractError> {
    let raw = fields
        .get(DATE_TIME_ORIGINAL)
        .ok_or(ExtractError::NoMetadata)?;
    EXIF_DATE_TIME
        .parse(raw.trim())
        .ok_or_else(|| ExtractError::MalformedTimestamp(raw.clone()))
}
