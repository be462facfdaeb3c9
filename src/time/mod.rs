//! time — normalization of time arguments to GPS seconds.
//!
//! Purpose
//! -------
//! Accept the many ways a caller may say "when" (GPS seconds as a number or
//! string, a calendar string, a UTC timestamp, a split GPS time, or `"now"`)
//! and reduce them to one `f64` count of GPS seconds through [`to_gps`].
//!
//! Key behaviors
//! -------------
//! - Numbers pass through unchanged after a finiteness check.
//! - Strings are tried as a decimal number first, then as RFC 3339, then as
//!   a handful of calendar layouts interpreted in UTC:
//!   `YYYY-MM-DD HH:MM:SS[.f]`, `YYYY-MM-DDTHH:MM:SS[.f]`, `YYYY-MM-DD`,
//!   `Mon DD YYYY HH:MM:SS`, and `Mon DD YYYY`.
//! - UTC timestamps are converted with the leap-second table in [`gps`].
//!
//! Downstream usage
//! ----------------
//! - Series constructors and `set_epoch` accept any `Into<TimeInput>`.
//! - Acquisition entry points normalize `start` / `end` through here.
pub mod errors;
pub mod gps;

pub use errors::{TimeError, TimeResult};
pub use gps::{GPS_EPOCH_UNIX, LigoTimeGps, gps_to_utc, utc_to_gps};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Any value that can be normalized to GPS seconds.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeInput {
    Gps(f64),
    Text(String),
    Utc(DateTime<Utc>),
    Split(LigoTimeGps),
}

impl From<f64> for TimeInput {
    fn from(value: f64) -> TimeInput {
        TimeInput::Gps(value)
    }
}

impl From<i64> for TimeInput {
    fn from(value: i64) -> TimeInput {
        TimeInput::Gps(value as f64)
    }
}

impl From<u32> for TimeInput {
    fn from(value: u32) -> TimeInput {
        TimeInput::Gps(f64::from(value))
    }
}

impl From<&str> for TimeInput {
    fn from(value: &str) -> TimeInput {
        TimeInput::Text(value.to_string())
    }
}

impl From<String> for TimeInput {
    fn from(value: String) -> TimeInput {
        TimeInput::Text(value)
    }
}

impl From<DateTime<Utc>> for TimeInput {
    fn from(value: DateTime<Utc>) -> TimeInput {
        TimeInput::Utc(value)
    }
}

impl From<LigoTimeGps> for TimeInput {
    fn from(value: LigoTimeGps) -> TimeInput {
        TimeInput::Split(value)
    }
}

const DATETIME_LAYOUTS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%b %d %Y %H:%M:%S"];
const DATE_LAYOUTS: [&str; 2] = ["%Y-%m-%d", "%b %d %Y"];

/// Normalize `value` to GPS seconds.
///
/// Errors
/// ------
/// - `TimeError::NonFinite` for NaN or infinite numbers.
/// - `TimeError::Unparseable` for strings matching no accepted format.
pub fn to_gps(value: impl Into<TimeInput>) -> TimeResult<f64> {
    match value.into() {
        TimeInput::Gps(seconds) => finite(seconds),
        TimeInput::Split(split) => Ok(split.as_f64()),
        TimeInput::Utc(time) => Ok(utc_to_gps(&time)),
        TimeInput::Text(text) => parse_text(&text),
    }
}

fn finite(seconds: f64) -> TimeResult<f64> {
    if seconds.is_finite() { Ok(seconds) } else { Err(TimeError::NonFinite { value: seconds }) }
}

fn parse_text(text: &str) -> TimeResult<f64> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("now") {
        return Ok(utc_to_gps(&Utc::now()).floor());
    }
    if let Ok(seconds) = trimmed.parse::<f64>() {
        return finite(seconds);
    }
    if let Ok(time) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(utc_to_gps(&time.with_timezone(&Utc)));
    }
    for layout in DATETIME_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Ok(utc_to_gps(&naive.and_utc()));
        }
    }
    for layout in DATE_LAYOUTS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, layout) {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(utc_to_gps(&midnight.and_utc()));
            }
        }
    }
    Err(TimeError::Unparseable { input: text.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    // Purpose
    // -------
    // Every accepted spelling of the same instant yields the same GPS time.
    fn equivalent_inputs_agree() {
        let expected = 1_126_259_462.0;
        assert_eq!(to_gps(expected), Ok(expected));
        assert_eq!(to_gps(1_126_259_462_i64), Ok(expected));
        assert_eq!(to_gps("1126259462"), Ok(expected));
        assert_eq!(to_gps("2015-09-14T09:50:45Z"), Ok(expected));
        assert_eq!(to_gps("2015-09-14 09:50:45"), Ok(expected));
        assert_eq!(to_gps("Sep 14 2015 09:50:45"), Ok(expected));
        assert_eq!(to_gps(Utc.with_ymd_and_hms(2015, 9, 14, 9, 50, 45).unwrap()), Ok(expected));
        assert_eq!(to_gps(LigoTimeGps::new(1_126_259_462, 0)), Ok(expected));
    }

    #[test]
    fn date_only_is_midnight_utc() {
        assert_eq!(to_gps("2015-09-14"), Ok(1_126_224_017.0));
    }

    #[test]
    fn now_is_after_2020() {
        assert!(to_gps("now").unwrap() > 1_261_872_018.0);
    }

    #[test]
    fn bad_inputs_are_rejected() {
        assert_eq!(to_gps("tomorrow"), Err(TimeError::Unparseable { input: "tomorrow".into() }));
        assert!(matches!(to_gps(f64::NAN), Err(TimeError::NonFinite { .. })));
    }
}
