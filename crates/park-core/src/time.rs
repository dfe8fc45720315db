//! Hour-precision timestamps.
//!
//! Every timestamp the matcher reasons about is a UTC instant truncated to
//! the whole hour. Text input follows the `YYYY-MM-DDTHH` layout; anything
//! after the hour (minutes, seconds, offsets) is ignored.

use chrono::{DateTime, DurationRound, NaiveDateTime, TimeDelta, Utc};

use crate::error::{ParkError, Result};

/// `strftime` layout of an hour timestamp.
pub const HOUR_FORMAT: &str = "%Y-%m-%dT%H";

/// Length of the `YYYY-MM-DDTHH` prefix.
const HOUR_PREFIX_LEN: usize = 13;

/// Drops minutes, seconds and sub-second precision.
#[must_use]
pub fn floor_to_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(TimeDelta::hours(1)).unwrap_or(ts)
}

/// Parses an hour timestamp such as `2018-01-02T03` or `2018-01-02T03:04`.
///
/// # Errors
///
/// Returns [`ParkError::InvalidArgument`] if the first 13 characters (after
/// trimming) are not a valid `YYYY-MM-DDTHH` timestamp.
pub fn parse_hour(text: &str) -> Result<DateTime<Utc>> {
    let trimmed = text.trim();
    let prefix = trimmed
        .get(..HOUR_PREFIX_LEN)
        .ok_or_else(|| ParkError::invalid(format!("'{trimmed}' is not an hour timestamp")))?;

    // chrono refuses to build a datetime without minutes
    NaiveDateTime::parse_from_str(&format!("{prefix}:00"), "%Y-%m-%dT%H:%M")
        .map(|naive| naive.and_utc())
        .map_err(|e| ParkError::invalid(format!("'{trimmed}' is not an hour timestamp: {e}")))
}

/// Renders a timestamp as `YYYY-MM-DDTHH`.
#[must_use]
pub fn format_hour(ts: DateTime<Utc>) -> String {
    ts.format(HOUR_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    fn expected() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 1, 2, 3, 0, 0).unwrap()
    }

    #[test_case("2018-01-02T03" ; "bare hour")]
    #[test_case("2018-01-02T03:04" ; "with minutes")]
    #[test_case(" 2018-01-02T03:04" ; "leading whitespace")]
    #[test_case("2018-01-02T03:04:05Z" ; "with seconds and zone")]
    fn parse_hour_accepts(input: &str) {
        assert_eq!(parse_hour(input).unwrap(), expected());
    }

    #[test_case("" ; "empty")]
    #[test_case("2018-01-02" ; "date only")]
    #[test_case("2018-13-02T03" ; "bad month")]
    #[test_case("yesterday noon" ; "prose")]
    fn parse_hour_rejects(input: &str) {
        assert!(matches!(
            parse_hour(input),
            Err(ParkError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn floor_drops_sub_hour_precision() {
        let ts = Utc.with_ymd_and_hms(2018, 1, 2, 3, 4, 5).unwrap()
            + TimeDelta::milliseconds(6);
        assert_eq!(floor_to_hour(ts), expected());
        assert_eq!(floor_to_hour(expected()), expected());
    }

    #[test]
    fn format_is_inverse_of_parse() {
        assert_eq!(format_hour(expected()), "2018-01-02T03");
        assert_eq!(parse_hour(&format_hour(expected())).unwrap(), expected());
    }
}
