//! Capture timestamps from embedded image metadata.

use chrono::{DateTime, NaiveDate, Utc};
use exif::{In, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised when metadata cannot be decoded at all.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The file could not be opened.
    #[error("Failed to open {path} for metadata")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file has no decodable metadata block.
    #[error("No decodable metadata in {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: exif::Error,
    },
}

/// Reads the original capture time of an image.
///
/// `Err` means the metadata could not be decoded at all. `Ok(None)` means it
/// decoded but the timestamp field is absent or malformed.
pub trait MetadataReader: Send + Sync {
    /// Returns the capture timestamp recorded in `path`.
    fn capture_time(&self, path: &Path) -> Result<Option<DateTime<Utc>>, MetadataError>;
}

/// [`MetadataReader`] backed by the EXIF block of JPEG/TIFF/HEIF/PNG/WebP files.
///
/// Uses `DateTimeOriginal` and falls back to the `DateTime` tag when the
/// former is absent. EXIF timestamps carry no zone and are read as UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifMetadataReader;

impl ExifMetadataReader {
    /// Creates a new EXIF reader.
    pub fn new() -> Self {
        Self
    }
}

impl MetadataReader for ExifMetadataReader {
    fn capture_time(&self, path: &Path) -> Result<Option<DateTime<Utc>>, MetadataError> {
        let file = File::open(path).map_err(|e| MetadataError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut reader = BufReader::new(file);
        let exif = exif::Reader::new()
            .read_from_container(&mut reader)
            .map_err(|e| MetadataError::Decode {
                path: path.to_path_buf(),
                source: e,
            })?;

        let field = exif
            .get_field(Tag::DateTimeOriginal, In::PRIMARY)
            .or_else(|| exif.get_field(Tag::DateTime, In::PRIMARY));

        Ok(field.and_then(|f| ascii_timestamp(&f.value)))
    }
}

fn ascii_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let Value::Ascii(ref parts) = *value else {
        return None;
    };
    let dt = exif::DateTime::from_ascii(parts.first()?).ok()?;

    NaiveDate::from_ymd_opt(i32::from(dt.year), u32::from(dt.month), u32::from(dt.day))?
        .and_hms_opt(u32::from(dt.hour), u32::from(dt.minute), u32::from(dt.second))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_reads_date_time_original() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("shot.jpg");
        std::fs::write(&path, fixtures::jpeg_with_capture_time("2019:03:04 05:06:07")).unwrap();

        let time = ExifMetadataReader::new().capture_time(&path).unwrap();
        assert_eq!(time, Some(Utc.with_ymd_and_hms(2019, 3, 4, 5, 6, 7).unwrap()));
    }

    #[test]
    fn test_falls_back_to_date_time_tag() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("edited.jpg");
        std::fs::write(&path, fixtures::jpeg_with_modify_time("2018:12:24 18:00:00")).unwrap();

        let time = ExifMetadataReader::new().capture_time(&path).unwrap();
        assert_eq!(time, Some(Utc.with_ymd_and_hms(2018, 12, 24, 18, 0, 0).unwrap()));
    }

    #[test]
    fn test_missing_timestamp_is_none() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plain.jpg");
        std::fs::write(&path, fixtures::jpeg_without_timestamp()).unwrap();

        let time = ExifMetadataReader::new().capture_time(&path).unwrap();
        assert_eq!(time, None);
    }

    #[test]
    fn test_malformed_timestamp_is_none() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.jpg");
        std::fs::write(&path, fixtures::jpeg_with_capture_time("not a date")).unwrap();

        let time = ExifMetadataReader::new().capture_time(&path).unwrap();
        assert_eq!(time, None);
    }

    #[test]
    fn test_garbage_file_is_decode_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("garbage.jpg");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let err = ExifMetadataReader::new().capture_time(&path).unwrap_err();
        assert!(matches!(err, MetadataError::Decode { .. }));
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let temp = TempDir::new().unwrap();
        let err = ExifMetadataReader::new()
            .capture_time(&temp.path().join("gone.jpg"))
            .unwrap_err();
        assert!(matches!(err, MetadataError::Open { .. }));
    }
}
