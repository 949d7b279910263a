/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Elapsed / remaining span broken into clock fields.
//!
//! A [`Duration`] is what the countdown display shows.  It is normally produced
//! by subtracting two timestamps with [`Duration::between`]; a negative
//! difference (clock skew, a query past the period end) clamps to zero rather
//! than failing.

use std::fmt;

use chrono::NaiveDateTime;

use super::{TimeError, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};

/// Non-negative span decomposed into days, hours, minutes, seconds and
/// milliseconds.
///
/// Carry bounds: `hours < 24`, `minutes < 60`, `seconds < 60`,
/// `milliseconds < 1000`.  The one exception is a value returned by
/// [`convert_days_to_hours`](Self::convert_days_to_hours), where `days == 0` and
/// `hours` absorbs the whole-day part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Duration {
    days: u32,
    hours: u32,
    minutes: u32,
    seconds: u32,
    milliseconds: u32,
}

impl Duration {
    pub const ZERO: Duration = Duration {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        milliseconds: 0,
    };

    /// Checked constructor.  Rejects any field outside its carry bound.
    pub fn new(
        days: u32,
        hours: u32,
        minutes: u32,
        seconds: u32,
        milliseconds: u32,
    ) -> Result<Self, TimeError> {
        for (field, value, max) in [
            ("hours", hours, 23),
            ("minutes", minutes, 59),
            ("seconds", seconds, 59),
            ("milliseconds", milliseconds, 999),
        ] {
            if value > max {
                return Err(TimeError::OutOfRange {
                    field,
                    value: value as u64,
                    max: max as u64,
                });
            }
        }
        Ok(Self {
            days,
            hours,
            minutes,
            seconds,
            milliseconds,
        })
    }

    /// Decompose a total millisecond count.
    pub fn from_millis(total: u64) -> Self {
        let day = MS_PER_DAY as u64;
        let hour = MS_PER_HOUR as u64;
        let minute = MS_PER_MINUTE as u64;
        let second = MS_PER_SECOND as u64;

        // Saturate rather than wrap for absurd spans (>11 million years).
        let days = u32::try_from(total / day).unwrap_or(u32::MAX);
        let rest = total % day;
        Self {
            days,
            hours: (rest / hour) as u32,
            minutes: ((rest % hour) / minute) as u32,
            seconds: ((rest % minute) / second) as u32,
            milliseconds: (rest % second) as u32,
        }
    }

    /// `end - start`, clamped to zero when `end` is earlier.
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let delta = end.signed_duration_since(start).num_milliseconds();
        Self::from_millis(delta.max(0) as u64)
    }

    /// Fold the whole-day part into `hours` (`1d 02:00:00` → `26:00:00`).
    pub fn convert_days_to_hours(self) -> Self {
        Self {
            days: 0,
            hours: self.hours.saturating_add(self.days.saturating_mul(24)),
            ..self
        }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn milliseconds(&self) -> u32 {
        self.milliseconds
    }

    pub fn total_millis(&self) -> u64 {
        self.days as u64 * MS_PER_DAY as u64
            + self.hours as u64 * MS_PER_HOUR as u64
            + self.minutes as u64 * MS_PER_MINUTE as u64
            + self.seconds as u64 * MS_PER_SECOND as u64
            + self.milliseconds as u64
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Duration {
    /// Countdown form: `MM:SS` under an hour, `H:MM:SS` under a day, and
    /// `Nd HH:MM:SS` beyond.  Milliseconds are not shown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(
                f,
                "{}d {:02}:{:02}:{:02}",
                self.days, self.hours, self.minutes, self.seconds
            )
        } else if self.hours > 0 {
            write!(f, "{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
        } else {
            write!(f, "{:02}:{:02}", self.minutes, self.seconds)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 9, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn between_decomposes_three_minutes() {
        let d = Duration::between(at(8, 52, 0), at(8, 55, 0));
        assert_eq!(d, Duration::new(0, 0, 3, 0, 0).unwrap());
        assert_eq!(d.to_string(), "03:00");
    }

    #[test]
    fn between_clamps_negative_to_zero() {
        let d = Duration::between(at(9, 0, 0), at(8, 0, 0));
        assert!(d.is_zero());
    }

    #[test]
    fn from_millis_carries_every_field() {
        let total = 2 * MS_PER_DAY as u64 + 3 * MS_PER_HOUR as u64 + 4 * MS_PER_MINUTE as u64 + 5_006;
        let d = Duration::from_millis(total);
        assert_eq!(
            (d.days(), d.hours(), d.minutes(), d.seconds(), d.milliseconds()),
            (2, 3, 4, 5, 6)
        );
        assert_eq!(d.total_millis(), total);
    }

    #[test]
    fn convert_days_to_hours_keeps_total() {
        let d = Duration::new(1, 2, 0, 0, 0).unwrap();
        let c = d.convert_days_to_hours();
        assert_eq!((c.days(), c.hours()), (0, 26));
        assert_eq!(c.total_millis(), d.total_millis());
        assert_eq!(c.to_string(), "26:00:00");
    }

    #[test]
    fn new_rejects_out_of_range_fields() {
        assert!(Duration::new(0, 24, 0, 0, 0).is_err());
        assert!(Duration::new(0, 0, 60, 0, 0).is_err());
        assert!(Duration::new(0, 0, 0, 60, 0).is_err());
        assert!(Duration::new(0, 0, 0, 0, 1_000).is_err());
        assert!(Duration::new(400, 23, 59, 59, 999).is_ok());
    }

    #[test]
    fn display_switches_form_by_magnitude() {
        assert_eq!(Duration::new(0, 1, 5, 9, 0).unwrap().to_string(), "1:05:09");
        assert_eq!(Duration::new(3, 1, 5, 9, 0).unwrap().to_string(), "3d 01:05:09");
    }
}
