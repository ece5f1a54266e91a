// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};

/// The wall clock that calendar intervals and formats are evaluated in.
///
/// Instants are always [`DateTime<Utc>`]; a calendar decides where day,
/// month and year boundaries fall.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Calendar {
    /// Coordinated universal time.
    #[default]
    Utc,
    /// The host's local time zone, including daylight saving transitions.
    Local,
    /// A fixed offset from UTC.
    Fixed(FixedOffset),
}

impl Calendar {
    /// Returns the wall-clock reading of `t`.
    #[must_use]
    pub fn to_naive(self, t: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Utc => t.naive_utc(),
            Self::Local => t.with_timezone(&Local).naive_local(),
            Self::Fixed(offset) => t.with_timezone(&offset).naive_local(),
        }
    }

    /// Returns the instant whose wall-clock reading is `naive`.
    ///
    /// An ambiguous reading resolves to the earlier instant. A reading that
    /// falls into a daylight saving gap moves forward by an hour.
    #[must_use]
    pub fn from_naive(self, naive: NaiveDateTime) -> DateTime<Utc> {
        match self {
            Self::Utc => naive.and_utc(),
            Self::Fixed(offset) => offset
                .from_local_datetime(&naive)
                .earliest()
                .map_or_else(|| naive.and_utc(), |t| t.with_timezone(&Utc)),
            Self::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .or_else(|| {
                    let later = naive.checked_add_signed(TimeDelta::hours(1))?;
                    Local.from_local_datetime(&later).earliest()
                })
                .map_or_else(|| naive.and_utc(), |t| t.with_timezone(&Utc)),
        }
    }

    /// Returns the offset from UTC at `t`, in seconds east.
    #[must_use]
    pub fn offset_seconds(self, t: DateTime<Utc>) -> i32 {
        match self {
            Self::Utc => 0,
            Self::Local => Local
                .offset_from_utc_datetime(&t.naive_utc())
                .fix()
                .local_minus_utc(),
            Self::Fixed(offset) => offset.local_minus_utc(),
        }
    }
}

/// Converts a millisecond timestamp to an instant, saturating at chrono's
/// supported range.
pub(crate) fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or(if ms < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn fixed_offset_round_trips_wall_clock() {
        let tokyo = Calendar::Fixed(FixedOffset::east_opt(9 * 3600).unwrap());
        let t = DateTime::parse_from_rfc3339("2020-03-01T20:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let wall = tokyo.to_naive(t);
        assert_eq!(
            wall,
            NaiveDate::from_ymd_opt(2020, 3, 2)
                .unwrap()
                .and_hms_opt(5, 30, 0)
                .unwrap()
        );
        assert_eq!(tokyo.from_naive(wall), t);
        assert_eq!(tokyo.offset_seconds(t), 9 * 3600);
    }

    #[test]
    fn utc_is_identity() {
        let t = from_millis(1_234_567_890_123);
        assert_eq!(Calendar::Utc.from_naive(Calendar::Utc.to_naive(t)), t);
        assert_eq!(Calendar::Utc.offset_seconds(t), 0);
    }

    #[test]
    fn millis_saturate() {
        assert_eq!(from_millis(i64::MAX), DateTime::<Utc>::MAX_UTC);
        assert_eq!(from_millis(i64::MIN), DateTime::<Utc>::MIN_UTC);
    }
}
