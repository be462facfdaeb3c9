//! GPS time scale: split-second representation and conversion to and from
//! UTC with the leap-second table.
//!
//! GPS seconds count from 1980-01-06T00:00:00 UTC without leap seconds, so
//! `gps = unix - 315964800 + leaps(unix)` where `leaps` counts the leap
//! seconds inserted since the GPS epoch.
use crate::time::errors::{TimeError, TimeResult};
use chrono::{DateTime, Utc};
use std::fmt;

/// Unix timestamp of the GPS epoch, 1980-01-06T00:00:00 UTC.
pub const GPS_EPOCH_UNIX: i64 = 315_964_800;

/// Unix timestamps at which a leap second took effect (00:00:00 UTC of the
/// listed day), since the GPS epoch.
const LEAP_SECONDS_UNIX: [i64; 18] = [
    362_793_600,   // 1981-07-01
    394_329_600,   // 1982-07-01
    425_865_600,   // 1983-07-01
    489_024_000,   // 1985-07-01
    567_993_600,   // 1988-01-01
    631_152_000,   // 1990-01-01
    662_688_000,   // 1991-01-01
    709_948_800,   // 1992-07-01
    741_484_800,   // 1993-07-01
    773_020_800,   // 1994-07-01
    820_454_400,   // 1996-01-01
    867_715_200,   // 1997-07-01
    915_148_800,   // 1999-01-01
    1_136_073_600, // 2006-01-01
    1_230_768_000, // 2009-01-01
    1_341_100_800, // 2012-07-01
    1_435_708_800, // 2015-07-01
    1_483_228_800, // 2017-01-01
];

/// Leap seconds accumulated at Unix time `unix`.
fn leaps_at_unix(unix: f64) -> i64 {
    LEAP_SECONDS_UNIX.iter().filter(|&&t| unix >= t as f64).count() as i64
}

/// Leap seconds accumulated at GPS time `gps`.
fn leaps_at_gps(gps: f64) -> i64 {
    LEAP_SECONDS_UNIX
        .iter()
        .enumerate()
        .filter(|&(k, &t)| gps >= (t - GPS_EPOCH_UNIX + k as i64 + 1) as f64)
        .count() as i64
}

/// GPS seconds of a UTC timestamp.
pub fn utc_to_gps(time: &DateTime<Utc>) -> f64 {
    let unix = time.timestamp() as f64 + f64::from(time.timestamp_subsec_nanos()) * 1e-9;
    unix - GPS_EPOCH_UNIX as f64 + leaps_at_unix(unix) as f64
}

/// UTC timestamp of GPS seconds `gps`.
///
/// Errors
/// ------
/// - `NonFinite` for NaN or infinite input.
/// - `OutOfRange` when the result cannot be represented.
pub fn gps_to_utc(gps: f64) -> TimeResult<DateTime<Utc>> {
    if !gps.is_finite() {
        return Err(TimeError::NonFinite { value: gps });
    }
    let unix = gps + GPS_EPOCH_UNIX as f64 - leaps_at_gps(gps) as f64;
    let secs = unix.floor();
    let nanos = ((unix - secs) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::<Utc>::from_timestamp(secs as i64, nanos).ok_or(TimeError::OutOfRange { value: gps })
}

/// GPS time split into whole seconds and nanoseconds.
///
/// Used as the epoch representation of foreign series types; orders and
/// compares exactly, unlike `f64` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LigoTimeGps {
    pub gps_seconds: i64,
    pub gps_nanoseconds: u32,
}

impl LigoTimeGps {
    pub fn new(gps_seconds: i64, gps_nanoseconds: u32) -> LigoTimeGps {
        let carry = i64::from(gps_nanoseconds / 1_000_000_000);
        LigoTimeGps { gps_seconds: gps_seconds + carry, gps_nanoseconds: gps_nanoseconds % 1_000_000_000 }
    }

    /// Nearest split representation of `seconds`, rounded to the nanosecond.
    pub fn from_f64(seconds: f64) -> TimeResult<LigoTimeGps> {
        if !seconds.is_finite() {
            return Err(TimeError::NonFinite { value: seconds });
        }
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1e9).round() as u32;
        Ok(LigoTimeGps::new(whole as i64, nanos))
    }

    pub fn as_f64(&self) -> f64 {
        self.gps_seconds as f64 + f64::from(self.gps_nanoseconds) * 1e-9
    }
}

impl fmt::Display for LigoTimeGps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.gps_seconds, self.gps_nanoseconds)
    }
}

impl From<LigoTimeGps> for f64 {
    fn from(value: LigoTimeGps) -> f64 {
        value.as_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    #[test]
    // Purpose
    // -------
    // Conversion honours the 17 leap seconds in effect in September 2015.
    //
    // Given
    // -----
    // - GPS 1126259462, a well-known reference time.
    //
    // Expect
    // ------
    // - 2015-09-14T09:50:45Z, and the inverse recovers the GPS value.
    fn reference_event_converts_both_ways() {
        let utc = gps_to_utc(1_126_259_462.0).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2015, 9, 14, 9, 50, 45).unwrap());
        assert_relative_eq!(utc_to_gps(&utc), 1_126_259_462.0);
    }

    #[test]
    fn gps_epoch_is_zero() {
        let epoch = Utc.with_ymd_and_hms(1980, 1, 6, 0, 0, 0).unwrap();
        assert_eq!(utc_to_gps(&epoch), 0.0);
        assert_eq!(gps_to_utc(0.0).unwrap(), epoch);
    }

    #[test]
    fn leap_second_boundary_2017() {
        let after = Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2016, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(utc_to_gps(&after) - utc_to_gps(&before), 2.0);
        assert_eq!(gps_to_utc(utc_to_gps(&after)).unwrap(), after);
    }

    #[test]
    fn split_representation_normalizes() {
        let t = LigoTimeGps::new(10, 1_500_000_000);
        assert_eq!(t, LigoTimeGps { gps_seconds: 11, gps_nanoseconds: 500_000_000 });
        assert_eq!(t.to_string(), "11.500000000");
        assert_eq!(LigoTimeGps::from_f64(-0.25).unwrap(), LigoTimeGps::new(-1, 750_000_000));
        assert!(LigoTimeGps::from_f64(f64::INFINITY).is_err());
        assert!(gps_to_utc(f64::NAN).is_err());
    }
}
