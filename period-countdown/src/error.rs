/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for schedule construction.
//!
//! Everything in this module is a *load-time* failure: a school definition
//! that is malformed never becomes an active [`CalendarIndex`].  Queries
//! against a built index are total and have no error type at all.
//!
//! Every variant carries the offending values (day name, period name, times)
//! so the loader can log the exact location of the problem without further
//! parsing.
//!
//! [`CalendarIndex`]: crate::calendar::CalendarIndex

use chrono::NaiveDate;
use thiserror::Error;

use crate::time::{TimeError, TimeOfDay};

/// Why a school definition was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    // ── Period level ──────────────────────────────────────────────────────────
    /// A time string or field could not be turned into a [`TimeOfDay`].
    #[error("invalid time in {context}: {source}")]
    InvalidTime {
        context: String,
        #[source]
        source: TimeError,
    },

    /// A numeric period type that is neither a class number nor a known
    /// filler code.
    #[error("invalid period type {raw} (expected a class number >= 0, -1 for filler or -2 for special)")]
    InvalidPeriodId { raw: i64 },

    /// A textual period type other than `nothing` / `special`.
    #[error("unknown period type '{value}' (expected a class number, 'nothing' or 'special')")]
    UnknownPeriodType { value: String },

    /// `start >= end`.
    #[error("period '{name}' has empty or inverted range {start}-{end}")]
    EmptyPeriod {
        name: String,
        start: TimeOfDay,
        end: TimeOfDay,
    },

    /// A class number outside the school's `[first_period, last_period]`.
    #[error("day '{day}': class {class} is outside the allowed range {first}..={last}")]
    ClassOutOfRange {
        day: String,
        class: u32,
        first: u32,
        last: u32,
    },

    // ── Day level ─────────────────────────────────────────────────────────────
    /// A day with no periods cannot cover the day.
    #[error("day '{day}' has no periods")]
    EmptyDay { day: String },

    /// The first period does not begin at midnight.
    #[error("day '{day}' starts at {start} instead of 00:00")]
    DayStartsLate { day: String, start: TimeOfDay },

    /// The last period does not reach 23:59:59.999.
    #[error("day '{day}' ends at {end} instead of 23:59:59.999")]
    DayEndsEarly { day: String, end: TimeOfDay },

    /// Time between two consecutive periods is not covered.
    #[error("day '{day}': gap between '{before}' (ends {end}) and '{after}' (starts {start})")]
    Gap {
        day: String,
        before: String,
        end: TimeOfDay,
        after: String,
        start: TimeOfDay,
    },

    /// Two consecutive periods overlap.
    #[error("day '{day}': '{after}' (starts {start}) overlaps '{before}' (ends {end})")]
    Overlap {
        day: String,
        before: String,
        end: TimeOfDay,
        after: String,
        start: TimeOfDay,
    },

    // ── Week level ────────────────────────────────────────────────────────────
    /// A week definition must list Sunday through Saturday.
    #[error("week '{week}' lists {len} days (expected 7, Sunday through Saturday)")]
    WrongWeekLength { week: String, len: usize },

    /// A week names a day type that is not defined.
    #[error("week '{week}' refers to undefined day '{day}'")]
    UnknownDay { week: String, day: String },

    // ── Calendar level ────────────────────────────────────────────────────────
    /// The configured default week is not defined.
    #[error("default week '{name}' is not defined")]
    MissingDefaultWeek { name: String },

    /// An exception names a week type that is not defined.
    #[error("exception for week of {week_tag} refers to undefined week '{week}'")]
    UnknownExceptionWeek { week: String, week_tag: NaiveDate },

    /// A week tag that is not a calendar date.
    #[error("invalid week tag '{input}' (expected YYYY-MM-DD)")]
    InvalidWeekTag { input: String },

    /// `first_period` is greater than `last_period`.
    #[error("class range {first}..={last} is empty (first_period > last_period)")]
    InvalidClassRange { first: u32, last: u32 },

    /// The school-year range is inverted.
    #[error("school year starts on {first} but ends on {last}")]
    InvalidSchoolYear { first: NaiveDate, last: NaiveDate },

    /// The `timezone` field is not an IANA zone name.
    #[error("unknown timezone '{name}'")]
    UnknownTimezone { name: String },
}
