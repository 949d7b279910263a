/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Civil time-of-day arithmetic at millisecond precision.
//!
//! Everything here is timezone-naive: a [`TimeOfDay`] is an offset from the
//! school's local midnight, never an absolute instant.  Conversion from a real
//! clock happens once, at the edge, in [`crate::config::School::to_local`].
//!
//! The last representable instant of a day is [`TimeOfDay::END_OF_DAY`]
//! (`23:59:59.999`).  A period that ends there is *closed* at the end: it also
//! contains that final millisecond, and its end instant for countdown purposes
//! is the following midnight.

pub mod duration;

pub use duration::Duration;

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

// ── Constants ─────────────────────────────────────────────────────────────────

pub const MS_PER_SECOND: u32 = 1_000;
pub const MS_PER_MINUTE: u32 = MS_PER_SECOND * 60;
pub const MS_PER_HOUR: u32 = MS_PER_MINUTE * 60;
pub const MS_PER_DAY: u32 = MS_PER_HOUR * 24;

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors produced when building a time value from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// The string is not `HH:MM`, `HH:MM:SS` or `HH:MM:SS.mmm`.
    Malformed { input: String },

    /// A single field exceeded its carry bound.
    OutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },
}

impl fmt::Display for TimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeError::Malformed { input } => write!(
                f,
                "malformed time '{input}' (expected HH:MM, HH:MM:SS or HH:MM:SS.mmm)"
            ),
            TimeError::OutOfRange { field, value, max } => {
                write!(f, "{field} value {value} is out of range (max {max})")
            }
        }
    }
}

impl std::error::Error for TimeError {}

fn check(field: &'static str, value: u64, max: u64) -> Result<(), TimeError> {
    if value > max {
        return Err(TimeError::OutOfRange { field, value, max });
    }
    Ok(())
}

// ── TimeOfDay ─────────────────────────────────────────────────────────────────

/// Milliseconds since local midnight, always within
/// `[00:00:00.000, 23:59:59.999]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MS_PER_DAY - 1);

    /// Build from a raw millisecond offset.
    pub fn from_millis(ms: u32) -> Result<Self, TimeError> {
        check("milliseconds of day", ms as u64, (MS_PER_DAY - 1) as u64)?;
        Ok(Self(ms))
    }

    /// Build from clock fields, each checked against its carry bound.
    pub fn from_hms_milli(hour: u32, minute: u32, second: u32, milli: u32) -> Result<Self, TimeError> {
        check("hour", hour as u64, 23)?;
        check("minute", minute as u64, 59)?;
        check("second", second as u64, 59)?;
        check("millisecond", milli as u64, 999)?;
        Ok(Self(
            hour * MS_PER_HOUR + minute * MS_PER_MINUTE + second * MS_PER_SECOND + milli,
        ))
    }

    /// Parse `HH:MM`, `HH:MM:SS` or `HH:MM:SS.mmm`.
    ///
    /// Hours may be written with one digit (`8:05`); every other field needs
    /// exactly two digits, and the fraction exactly three.
    pub fn parse(input: &str) -> Result<Self, TimeError> {
        let malformed = || TimeError::Malformed {
            input: input.to_string(),
        };
        let s = input.trim();

        let (clock, milli) = match s.split_once('.') {
            Some((clock, frac)) => {
                if frac.len() != 3 {
                    return Err(malformed());
                }
                (clock, parse_digits(frac).ok_or_else(malformed)?)
            }
            None => (s, 0),
        };

        let fields: Vec<&str> = clock.split(':').collect();
        let (h, m, sec) = match fields.as_slice() {
            [h, m] => (*h, *m, None),
            [h, m, sec] => (*h, *m, Some(*sec)),
            _ => return Err(malformed()),
        };
        // A fraction is only meaningful after seconds.
        if sec.is_none() && s.contains('.') {
            return Err(malformed());
        }
        if h.is_empty() || h.len() > 2 || m.len() != 2 || sec.is_some_and(|x| x.len() != 2) {
            return Err(malformed());
        }

        let hour = parse_digits(h).ok_or_else(malformed)?;
        let minute = parse_digits(m).ok_or_else(malformed)?;
        let second = match sec {
            Some(x) => parse_digits(x).ok_or_else(malformed)?,
            None => 0,
        };

        Self::from_hms_milli(hour, minute, second, milli)
    }

    /// Time of day of a chrono wall-clock time.  Leap-second nanoseconds are
    /// folded into the last millisecond of the second.
    pub fn from_naive_time(t: NaiveTime) -> Self {
        let milli = (t.nanosecond() / 1_000_000).min(999);
        Self(t.num_seconds_from_midnight() * MS_PER_SECOND + milli)
    }

    /// Time of day of a school-local timestamp.
    pub fn of(at: NaiveDateTime) -> Self {
        Self::from_naive_time(at.time())
    }

    pub fn as_millis(self) -> u32 {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0 / MS_PER_HOUR
    }

    pub fn minute(self) -> u32 {
        (self.0 % MS_PER_HOUR) / MS_PER_MINUTE
    }

    pub fn second(self) -> u32 {
        (self.0 % MS_PER_MINUTE) / MS_PER_SECOND
    }

    pub fn millisecond(self) -> u32 {
        self.0 % MS_PER_SECOND
    }

    pub fn is_end_of_day(self) -> bool {
        self == Self::END_OF_DAY
    }

    /// Offset of the instant this time stands for when used as an *exclusive*
    /// period end.  `END_OF_DAY` maps to the next midnight (`MS_PER_DAY`).
    pub fn end_millis(self) -> u64 {
        if self.is_end_of_day() {
            MS_PER_DAY as u64
        } else {
            self.0 as u64
        }
    }

    /// Wall-clock time on `date`.
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        // Every TimeOfDay is a valid NaiveTime; the fallback is unreachable.
        let time = NaiveTime::from_num_seconds_from_midnight_opt(
            self.0 / MS_PER_SECOND,
            self.millisecond() * 1_000_000,
        )
        .unwrap_or(NaiveTime::MIN);
        date.and_time(time)
    }
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for TimeOfDay {
    /// Shortest lossless clock form: `HH:MM`, `HH:MM:SS` or `HH:MM:SS.mmm`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())?;
        match (self.second(), self.millisecond()) {
            (0, 0) => Ok(()),
            (s, 0) => write!(f, ":{s:02}"),
            (s, ms) => write!(f, ":{s:02}.{ms:03}"),
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    // ── parse ─────────────────────────────────────────────────────────────────

    #[test]
    fn parse_accepts_all_three_forms() {
        assert_eq!(t("08:52").as_millis(), (8 * 60 + 52) * MS_PER_MINUTE);
        assert_eq!(t("08:52:30").second(), 30);
        assert_eq!(t("23:59:59.999"), TimeOfDay::END_OF_DAY);
    }

    #[test]
    fn parse_accepts_single_digit_hour() {
        assert_eq!(t("8:05"), t("08:05"));
    }

    #[test]
    fn parse_rejects_out_of_range_fields() {
        assert!(matches!(
            TimeOfDay::parse("24:00"),
            Err(TimeError::OutOfRange { field: "hour", .. })
        ));
        assert!(matches!(
            TimeOfDay::parse("12:60"),
            Err(TimeError::OutOfRange { field: "minute", .. })
        ));
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for bad in ["", "8", "08:5", "08:05:", "ab:cd", "08:05.123", "08:05:00.12", "-1:00"] {
            assert!(
                matches!(TimeOfDay::parse(bad), Err(TimeError::Malformed { .. })),
                "{bad:?} should be malformed"
            );
        }
    }

    // ── accessors / display ───────────────────────────────────────────────────

    #[test]
    fn display_uses_shortest_lossless_form() {
        assert_eq!(t("08:00").to_string(), "08:00");
        assert_eq!(t("08:00:05").to_string(), "08:00:05");
        assert_eq!(TimeOfDay::END_OF_DAY.to_string(), "23:59:59.999");
    }

    #[test]
    fn end_of_day_end_is_next_midnight() {
        assert_eq!(TimeOfDay::END_OF_DAY.end_millis(), MS_PER_DAY as u64);
        assert_eq!(t("09:45").end_millis(), t("09:45").as_millis() as u64);
    }

    #[test]
    fn naive_time_round_trips_through_on() {
        let date = NaiveDate::from_ymd_opt(2021, 9, 1).unwrap();
        let at = t("13:07:42.250").on(date);
        assert_eq!(TimeOfDay::of(at), t("13:07:42.250"));
        assert_eq!(at.date(), date);
    }

    #[test]
    fn from_millis_rejects_a_full_day() {
        assert!(TimeOfDay::from_millis(MS_PER_DAY).is_err());
        assert!(TimeOfDay::from_millis(MS_PER_DAY - 1).is_ok());
    }
}
