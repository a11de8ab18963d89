//! Testing utilities shared by unit and integration tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use snapstage_core::testing::{fixtures, MemorySink, ScriptedMover};
//!
//! let sink = Arc::new(MemorySink::new());
//! let mover = ScriptedMover::new();
//! mover.mismatch_times("/pics/a.jpg", 1).await;
//!
//! std::fs::write(dir.join("shot.jpg"), fixtures::jpeg_with_capture_time("2021:06:15 10:00:00"))?;
//! ```

mod memory_sink;
mod scripted_mover;

pub use memory_sink::MemorySink;
pub use scripted_mover::{RecordedMove, ScriptedMover};

/// Test fixtures and helper functions.
pub mod fixtures {
    use exif::experimental::Writer;
    use exif::{Field, In, Tag, Value};
    use std::io::Cursor;

    /// JPEG whose `DateTimeOriginal` is `timestamp` (EXIF `YYYY:MM:DD HH:MM:SS`).
    pub fn jpeg_with_capture_time(timestamp: &str) -> Vec<u8> {
        jpeg_with_fields(&[ascii_field(Tag::DateTimeOriginal, timestamp)])
    }

    /// JPEG with only the `DateTime` (last modified) tag set.
    pub fn jpeg_with_modify_time(timestamp: &str) -> Vec<u8> {
        jpeg_with_fields(&[ascii_field(Tag::DateTime, timestamp)])
    }

    /// JPEG with valid EXIF but no timestamp tag.
    pub fn jpeg_without_timestamp() -> Vec<u8> {
        jpeg_with_fields(&[ascii_field(Tag::Make, "snapstage")])
    }

    fn ascii_field(tag: Tag, text: &str) -> Field {
        Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![text.as_bytes().to_vec()]),
        }
    }

    /// SOI, an APP1 `Exif` segment holding the fields, EOI.
    fn jpeg_with_fields(fields: &[Field]) -> Vec<u8> {
        let mut writer = Writer::new();
        for field in fields {
            writer.push_field(field);
        }
        let mut tiff = Cursor::new(Vec::new());
        writer
            .write(&mut tiff, false)
            .expect("EXIF fixture should encode");
        let tiff = tiff.into_inner();

        let segment_len = u16::try_from(2 + 6 + tiff.len()).expect("EXIF fixture too large");
        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
        jpeg.extend_from_slice(&segment_len.to_be_bytes());
        jpeg.extend_from_slice(b"Exif\0\0");
        jpeg.extend_from_slice(&tiff);
        jpeg.extend_from_slice(&[0xFF, 0xD9]);
        jpeg
    }
}
