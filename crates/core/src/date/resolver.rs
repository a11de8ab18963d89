//! The fallback chain that turns a path into a canonical timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::compact::{parse_compact_date, sentinel_date};
use super::error::DateError;
use super::metadata::MetadataReader;
use super::patterns::{burst_cover_digits, messenger_img_digits};

/// Which step of the chain produced a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    /// Digits of a `Burst_Cover_GIF_Action_*.gif` name.
    BurstCoverName,
    /// Capture time recorded in the image metadata.
    Metadata,
    /// Metadata decoded without a usable timestamp.
    MetadataSentinel,
    /// Digits of an `IMG-*-*.jpg` name.
    MessengerName,
}

/// A resolved date together with how it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub timestamp: DateTime<Utc>,
    pub source: DateSource,
}

/// Resolves the date a picture should be filed under.
///
/// The chain, first success wins:
/// 1. burst-cover GIF name
/// 2. embedded metadata (sentinel 1900-01-01 if it decodes without a timestamp)
/// 3. `IMG-<digits>-*.jpg` name, only when metadata could not be decoded
#[derive(Debug, Clone)]
pub struct DateResolver<R> {
    metadata: R,
}

impl<R: MetadataReader> DateResolver<R> {
    /// Creates a resolver using `metadata` for step 2.
    pub fn new(metadata: R) -> Self {
        Self { metadata }
    }

    /// Resolves the timestamp for `path`.
    pub fn resolve(&self, path: &Path) -> Result<DateTime<Utc>, DateError> {
        self.resolve_with_source(path).map(|resolved| resolved.timestamp)
    }

    /// Resolves the timestamp for `path` and reports which step produced it.
    pub fn resolve_with_source(&self, path: &Path) -> Result<ResolvedDate, DateError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .ok_or_else(|| DateError::unresolvable(path, "path has no file name"))?;

        if let Some(digits) = burst_cover_digits(&file_name) {
            match parse_compact_date(digits) {
                Ok(timestamp) => {
                    return Ok(ResolvedDate {
                        timestamp,
                        source: DateSource::BurstCoverName,
                    })
                }
                Err(e) => tracing::debug!("Ignoring burst-cover digits in {}: {}", path.display(), e),
            }
        }

        let metadata_error = match self.metadata.capture_time(path) {
            Ok(Some(timestamp)) => {
                return Ok(ResolvedDate {
                    timestamp,
                    source: DateSource::Metadata,
                })
            }
            Ok(None) => {
                return Ok(ResolvedDate {
                    timestamp: sentinel_date(),
                    source: DateSource::MetadataSentinel,
                })
            }
            Err(e) => e,
        };

        if let Some(digits) = messenger_img_digits(&file_name) {
            return parse_compact_date(digits)
                .map(|timestamp| ResolvedDate {
                    timestamp,
                    source: DateSource::MessengerName,
                })
                .map_err(|e| DateError::unresolvable(path, e.to_string()));
        }

        Err(DateError::unresolvable(path, metadata_error.to_string()))
    }
}
