//! Date resolution for discovered pictures.
//!
//! A picture is filed under the date returned by [`DateResolver`], which
//! tries file name heuristics and embedded metadata in a fixed order. See the
//! resolver docs for the chain.
//!
//! # Example
//!
//! ```ignore
//! use snapstage_core::date::{DateResolver, ExifMetadataReader};
//!
//! let resolver = DateResolver::new(ExifMetadataReader::new());
//! let taken = resolver.resolve(Path::new("DCIM/IMG_0001.jpg"))?;
//! ```

mod compact;
mod error;
mod metadata;
mod patterns;
mod resolver;

pub use compact::{parse_compact_date, sentinel_date, FILENAME_ANCHOR_HOUR};
pub use error::DateError;
pub use metadata::{ExifMetadataReader, MetadataError, MetadataReader};
pub use patterns::{burst_cover_digits, messenger_img_digits};
pub use resolver::{DateResolver, DateSource, ResolvedDate};
