/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The atomic schedule unit.
//!
//! School files tag every period with a raw integer: a class number, `-1` for
//! low-priority filler (passing time, before/after school) or `-2` for
//! semi-important filler (lunch, tutorial).  That raw value is turned into a
//! [`PeriodId`] once, at load time, so no code past the loader ever compares
//! against magic numbers.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::error::ScheduleError;
use crate::time::{Duration, TimeOfDay};

// ── PeriodId ──────────────────────────────────────────────────────────────────

/// What kind of interval a [`Period`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodId {
    /// A real class slot.
    Class(u32),
    /// Unimportant filler (raw `-1`).  Adjacent fillers are merged.
    Filler,
    /// Semi-important filler (raw `-2`).  Never merged.
    Special,
    /// No period is defined at this time.
    Undefined,
}

impl PeriodId {
    pub const FILLER_RAW: i64 = -1;
    pub const SPECIAL_RAW: i64 = -2;

    /// Decode the integer form used by school files.
    pub fn from_raw(raw: i64) -> Result<Self, ScheduleError> {
        match raw {
            Self::FILLER_RAW => Ok(PeriodId::Filler),
            Self::SPECIAL_RAW => Ok(PeriodId::Special),
            n => u32::try_from(n)
                .map(PeriodId::Class)
                .map_err(|_| ScheduleError::InvalidPeriodId { raw }),
        }
    }

    /// Integer form; `None` for the sentinel, which has no file encoding.
    pub fn raw(self) -> Option<i64> {
        match self {
            PeriodId::Class(n) => Some(n as i64),
            PeriodId::Filler => Some(Self::FILLER_RAW),
            PeriodId::Special => Some(Self::SPECIAL_RAW),
            PeriodId::Undefined => None,
        }
    }

    pub fn class_number(self) -> Option<u32> {
        match self {
            PeriodId::Class(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_free(self) -> bool {
        !self.is_counted()
    }

    pub fn is_counted(self) -> bool {
        matches!(self, PeriodId::Class(_))
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodId::Class(n) => write!(f, "{n}"),
            PeriodId::Filler => f.write_str("filler"),
            PeriodId::Special => f.write_str("special"),
            PeriodId::Undefined => f.write_str("undefined"),
        }
    }
}

// ── Period ────────────────────────────────────────────────────────────────────

/// One interval of a school day: `[start, end)`, or `[start, end]` when `end`
/// is [`TimeOfDay::END_OF_DAY`].
///
/// Fields are private so a `Period` with `start >= end` cannot exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    id: PeriodId,
    name: String,
    start: TimeOfDay,
    end: TimeOfDay,
}

impl Period {
    /// # Errors
    /// [`ScheduleError::EmptyPeriod`] if `start >= end`.
    pub fn new(
        id: PeriodId,
        name: impl Into<String>,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Result<Self, ScheduleError> {
        let name = name.into();
        if start >= end {
            return Err(ScheduleError::EmptyPeriod { name, start, end });
        }
        Ok(Self {
            id,
            name,
            start,
            end,
        })
    }

    /// The "no period" sentinel returned when nothing covers a timestamp.
    pub fn undefined() -> Self {
        Self {
            id: PeriodId::Undefined,
            name: String::from("No period"),
            start: TimeOfDay::MIDNIGHT,
            end: TimeOfDay::END_OF_DAY,
        }
    }

    /// A single free period spanning the whole day.
    pub fn all_day(name: impl Into<String>) -> Self {
        Self {
            id: PeriodId::Special,
            name: name.into(),
            start: TimeOfDay::MIDNIGHT,
            end: TimeOfDay::END_OF_DAY,
        }
    }

    pub fn id(&self) -> PeriodId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn is_free(&self) -> bool {
        self.id.is_free()
    }

    pub fn is_counted(&self) -> bool {
        self.id.is_counted()
    }

    /// `true` for the period that closes the day.
    pub fn is_last(&self) -> bool {
        self.end.is_end_of_day()
    }

    pub fn contains(&self, t: TimeOfDay) -> bool {
        self.start <= t && (t < self.end || self.is_last())
    }

    /// How long the period lasts, start to end instant.
    pub fn length(&self) -> Duration {
        Duration::from_millis(self.end.end_millis() - self.start.as_millis() as u64)
    }

    pub fn start_on(&self, date: NaiveDate) -> NaiveDateTime {
        self.start.on(date)
    }

    /// End instant on `date`.  For the last period of the day this is the
    /// following midnight, saturating at [`NaiveDateTime::MAX`] on the last
    /// representable date.
    pub fn end_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN)
            .checked_add_signed(TimeDelta::milliseconds(self.end.end_millis() as i64))
            .unwrap_or(NaiveDateTime::MAX)
    }

    /// Copy of this period stretched to a new end.  Used by the filler merge.
    pub(crate) fn extended_to(&self, end: TimeOfDay) -> Self {
        debug_assert!(end > self.start);
        Self {
            end,
            ..self.clone()
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}-{}", self.id, self.name, self.start, self.end)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
