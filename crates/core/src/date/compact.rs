//! Compact `YYYYMMDD` dates found in file names.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use super::error::DateError;

/// Hour of day assigned to dates parsed from file names.
///
/// File names carry no time of day; 04:00 UTC keeps the date stable across
/// most time zones.
pub const FILENAME_ANCHOR_HOUR: u32 = 4;

/// Date assigned to files whose metadata decodes but has no usable timestamp.
pub fn sentinel_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1900, 1, 1, 0, 0, 0).unwrap()
}

/// Parses the first eight characters of `input` as year, month and day.
///
/// Parsing is lax: a field that is not a number counts as zero, and month or
/// day values outside their range roll over into the neighbouring month or
/// year (month `00` is December of the previous year, day `00` is the last
/// day of the previous month). The time is fixed at
/// [`FILENAME_ANCHOR_HOUR`]:00:00 UTC.
pub fn parse_compact_date(input: &str) -> Result<DateTime<Utc>, DateError> {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() < 8 {
        return Err(DateError::CompactDateTooShort {
            input: input.to_string(),
        });
    }

    let field = |from: usize, to: usize| -> i64 {
        chars[from..to]
            .iter()
            .collect::<String>()
            .parse()
            .unwrap_or(0)
    };

    let year = field(0, 4);
    let month = field(4, 6);
    let day = field(6, 8);

    rolled_over_date(year, month, day)
        .and_then(|date| date.and_hms_opt(FILENAME_ANCHOR_HOUR, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DateError::CompactDateOutOfRange {
            input: input.to_string(),
        })
}

fn rolled_over_date(year: i64, month: i64, day: i64) -> Option<NaiveDate> {
    let total_months = year.checked_mul(12)?.checked_add(month - 1)?;
    let year = i32::try_from(total_months.div_euclid(12)).ok()?;
    let month = u32::try_from(total_months.rem_euclid(12) + 1).ok()?;

    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_signed(Duration::try_days(day - 1)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_plain_date() {
        let date = parse_compact_date("20210615").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2021, 6, 15, 4, 0, 0).unwrap());
    }

    #[test]
    fn test_extra_digits_are_ignored() {
        let date = parse_compact_date("20210615120000").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2021, 6, 15));
        assert_eq!(date.hour(), FILENAME_ANCHOR_HOUR);
        assert_eq!(date.minute(), 0);
    }

    #[test]
    fn test_too_short_is_rejected() {
        let err = parse_compact_date("210615").unwrap_err();
        assert!(matches!(err, DateError::CompactDateTooShort { .. }));
    }

    #[test]
    fn test_month_zero_rolls_back_a_year() {
        let date = parse_compact_date("20210015").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2020, 12, 15));
    }

    #[test]
    fn test_month_overflow_rolls_forward() {
        let date = parse_compact_date("20211401").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2022, 2, 1));
    }

    #[test]
    fn test_day_overflow_rolls_into_next_month() {
        let date = parse_compact_date("20210231").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2021, 3, 3));
    }

    #[test]
    fn test_non_numeric_fields_count_as_zero() {
        // year "abcd" -> 0, month 06, day 15
        let date = parse_compact_date("abcd0615").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (0, 6, 15));

        // month "xx" -> 0 -> December of the previous year
        let date = parse_compact_date("2021xx15").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2020, 12, 15));
    }

    #[test]
    fn test_sentinel_date() {
        let sentinel = sentinel_date();
        assert_eq!(sentinel.year(), 1900);
        assert_eq!(sentinel.month(), 1);
        assert_eq!(sentinel.day(), 1);
        assert_eq!(sentinel.hour(), 0);
    }
}
