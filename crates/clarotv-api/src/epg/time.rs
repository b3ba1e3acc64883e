//! Wall-clock to epoch conversion.

use chrono::{LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;

use super::error::TimeError;

/// Zone used when none is configured.
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

/// Accepted wall-clock format (`YYYY-MM-DD HH:MM:SS`).
pub const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Resolves an IANA zone identifier.
///
/// # Errors
///
/// Returns [`TimeError::UnknownTimezone`] if `name` is not a known zone.
pub fn parse_timezone(name: &str) -> Result<Tz, TimeError> {
    name.parse::<Tz>()
        .map_err(|_| TimeError::UnknownTimezone(name.to_owned()))
}

/// Converts a `YYYY-MM-DD HH:MM:SS` wall-clock string in `timezone` to
/// epoch seconds.
///
/// # Errors
///
/// - [`TimeError::UnknownTimezone`] if the zone is not recognized.
/// - [`TimeError::Parse`] if the string does not match the format.
pub fn to_epoch(local: &str, timezone: &str) -> Result<i64, TimeError> {
    let tz = parse_timezone(timezone)?;
    let naive = NaiveDateTime::parse_from_str(local, LOCAL_DATETIME_FORMAT).map_err(|_| {
        TimeError::Parse {
            input: local.to_owned(),
        }
    })?;
    Ok(to_epoch_naive(naive, tz))
}

/// Converts an already-parsed wall-clock time in `tz` to epoch seconds.
///
/// Ambiguous times (clocks set back) resolve to the standard-time
/// instant. Times inside a gap (clocks set forward) use the offset in
/// force before the transition.
#[must_use]
pub fn to_epoch_naive(naive: NaiveDateTime, tz: Tz) -> i64 {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.timestamp(),
        LocalResult::Ambiguous(_, standard) => standard.timestamp(),
        LocalResult::None => {
            let probe = naive
                .checked_sub_signed(TimeDelta::days(1))
                .unwrap_or(naive);
            let offset = tz.offset_from_utc_datetime(&probe).fix();
            naive
                .and_utc()
                .timestamp()
                .saturating_sub(i64::from(offset.local_minus_utc()))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_new_year_2024_sao_paulo() {
        // Arrange & Act
        let epoch = to_epoch("2024-01-01 00:00:00", "America/Sao_Paulo").unwrap();

        // Assert: UTC-3 on that date
        assert_eq!(epoch, 1_704_078_000);
    }

    #[test]
    fn test_utc_zone_is_identity() {
        // Arrange & Act
        let epoch = to_epoch("1970-01-01 00:01:00", "UTC").unwrap();

        // Assert
        assert_eq!(epoch, 60);
    }

    #[test]
    fn test_monotonic_over_a_day_by_minute() {
        // Arrange
        let tz = parse_timezone(DEFAULT_TIMEZONE).unwrap();
        let mut current = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut previous = to_epoch_naive(current, tz);

        // Act & Assert
        for _ in 0..1_440 {
            current = current.checked_add_signed(TimeDelta::minutes(1)).unwrap();
            let next = to_epoch_naive(current, tz);
            assert!(next > previous, "not increasing at {current}");
            previous = next;
        }
    }

    #[test]
    fn test_monotonic_over_a_year_by_hour() {
        // Arrange
        let tz = parse_timezone(DEFAULT_TIMEZONE).unwrap();
        let mut current = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut previous = to_epoch_naive(current, tz);

        // Act & Assert
        for _ in 0..(366 * 24) {
            current = current.checked_add_signed(TimeDelta::hours(1)).unwrap();
            let next = to_epoch_naive(current, tz);
            assert_eq!(next - previous, 3_600, "unexpected step at {current}");
            previous = next;
        }
    }

    #[test]
    fn test_ambiguous_time_resolves_to_standard_offset() {
        // Arrange: DST ended 2019-02-17 00:00 (-02) -> 2019-02-16 23:00 (-03)

        // Act
        let epoch = to_epoch("2019-02-16 23:30:00", "America/Sao_Paulo").unwrap();

        // Assert: 2019-02-17T02:30:00Z
        assert_eq!(epoch, 1_550_370_600);
    }

    #[test]
    fn test_gap_time_uses_offset_before_transition() {
        // Arrange: DST began 2018-11-04 00:00 (-03) -> 01:00 (-02)

        // Act
        let epoch = to_epoch("2018-11-04 00:30:00", "America/Sao_Paulo").unwrap();

        // Assert: 2018-11-04T03:30:00Z
        assert_eq!(epoch, 1_541_302_200);
    }

    #[test]
    fn test_dst_offset_is_applied() {
        // Arrange: New York is UTC-4 in July
        let summer = to_epoch("2024-07-01 12:00:00", "America/New_York").unwrap();
        let as_utc = to_epoch("2024-07-01 12:00:00", "UTC").unwrap();

        // Assert
        assert_eq!(summer - as_utc, 4 * 3_600);
    }

    #[test]
    fn test_parse_error_on_wrong_format() {
        // Arrange
        let inputs = ["2024-01-01T00:00:00", "01/01/2024 10:00:00", "2024-01-01", ""];

        for input in inputs {
            // Act
            let result = to_epoch(input, DEFAULT_TIMEZONE);

            // Assert
            assert_eq!(
                result,
                Err(TimeError::Parse {
                    input: String::from(input)
                })
            );
        }
    }

    #[test]
    fn test_unknown_timezone() {
        // Arrange & Act
        let result = to_epoch("2024-01-01 00:00:00", "America/Atlantis");

        // Assert
        assert_eq!(
            result,
            Err(TimeError::UnknownTimezone(String::from("America/Atlantis")))
        );
    }
}
