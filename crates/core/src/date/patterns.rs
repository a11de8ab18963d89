//! File name heuristics for pictures that carry their date in the name.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Animated covers exported by phone cameras: `Burst_Cover_GIF_Action_<digits>.gif`.
static BURST_COVER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Burst_Cover_GIF_Action_(\d+)\.gif$").unwrap());

/// Messenger exports: `IMG-<digits>-<anything>.jpg`.
static MESSENGER_IMG: Lazy<Regex> = Lazy::new(|| Regex::new(r"IMG-(\d+)-.*\.jpg$").unwrap());

/// Digit run of a burst-cover GIF name, if `file_name` is one.
pub fn burst_cover_digits(file_name: &str) -> Option<&str> {
    BURST_COVER
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Digit run between the hyphens of an `IMG-<digits>-*.jpg` name.
pub fn messenger_img_digits(file_name: &str) -> Option<&str> {
    MESSENGER_IMG
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_cover_match() {
        assert_eq!(
            burst_cover_digits("Burst_Cover_GIF_Action_20210615120000.gif"),
            Some("20210615120000")
        );
        assert_eq!(
            burst_cover_digits("00000IMG_00000_Burst_Cover_GIF_Action_20190101.gif"),
            Some("20190101")
        );
    }

    #[test]
    fn test_burst_cover_rejects_other_names() {
        assert_eq!(burst_cover_digits("Burst_Cover_GIF_Action_.gif"), None);
        assert_eq!(burst_cover_digits("Burst_Cover_GIF_Action_2021.jpg"), None);
        assert_eq!(burst_cover_digits("Burst_Cover_GIF_Action_2021.GIF"), None);
        assert_eq!(burst_cover_digits("holiday.gif"), None);
    }

    #[test]
    fn test_messenger_img_match() {
        assert_eq!(
            messenger_img_digits("IMG-20200704-WA0012.jpg"),
            Some("20200704")
        );
        assert_eq!(messenger_img_digits("IMG-20200704-.jpg"), Some("20200704"));
    }

    #[test]
    fn test_messenger_img_rejects_other_names() {
        assert_eq!(messenger_img_digits("IMG_20200704_WA0012.jpg"), None);
        assert_eq!(messenger_img_digits("IMG-20200704-WA0012.JPG"), None);
        assert_eq!(messenger_img_digits("IMG-2020a704-WA0012.jpg"), None);
        assert_eq!(messenger_img_digits("IMG-20200704.jpg"), None);
    }
}
