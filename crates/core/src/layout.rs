//! Layout of the collection tree.

use chrono::{DateTime, Datelike, Utc};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Directory a picture dated `date` belongs in: `root/YYYY/MM/DD`.
///
/// The year is the plain integer, unpadded. Month and day are two digits.
pub fn canonical_dir(root: &Path, date: &DateTime<Utc>) -> PathBuf {
    root.join(date.year().to_string())
        .join(format!("{:02}", date.month()))
        .join(format!("{:02}", date.day()))
}

/// Full destination path for `base_name` dated `date`.
pub fn canonical_destination(root: &Path, date: &DateTime<Utc>, base_name: &OsStr) -> PathBuf {
    canonical_dir(root, date).join(base_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::sentinel_date;
    use chrono::TimeZone;

    #[test]
    fn test_zero_padded_components() {
        let date = Utc.with_ymd_and_hms(2021, 6, 5, 4, 0, 0).unwrap();
        assert_eq!(
            canonical_dir(Path::new("/tmp/picsToCopy"), &date),
            PathBuf::from("/tmp/picsToCopy/2021/06/05")
        );
    }

    #[test]
    fn test_sentinel_bucket() {
        assert_eq!(
            canonical_dir(Path::new("out"), &sentinel_date()),
            PathBuf::from("out/1900/01/01")
        );
    }

    #[test]
    fn test_destination_keeps_base_name() {
        let date = Utc.with_ymd_and_hms(2019, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(
            canonical_destination(Path::new("out"), &date, OsStr::new("IMG_1.JPG")),
            PathBuf::from("out/2019/12/31/IMG_1.JPG")
        );
    }

    #[test]
    fn test_year_is_not_padded() {
        let year_zero = Utc.with_ymd_and_hms(0, 6, 15, 4, 0, 0).unwrap();
        assert_eq!(
            canonical_dir(Path::new("out"), &year_zero),
            PathBuf::from("out/0/06/15")
        );

        let early = Utc.with_ymd_and_hms(812, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(
            canonical_dir(Path::new("out"), &early),
            PathBuf::from("out/812/01/02")
        );

        let before_zero = Utc.with_ymd_and_hms(-1, 6, 15, 4, 0, 0).unwrap();
        assert_eq!(
            canonical_dir(Path::new("out"), &before_zero),
            PathBuf::from("out/-1/06/15")
        );
    }
}
