/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Day and week schedule definitions.
//!
//! ```text
//! WeekPattern ──(weekday)──► Arc<DaySchedule> ──(time of day)──► Period
//!      │
//!      └── fallback: built-in all-day-free day for undefined weekdays
//! ```
//!
//! Both types are immutable once built.  Day schedules are shared between
//! week patterns through `Arc`, so a week exception that reuses the normal
//! `A` day does not copy it.

pub mod day;
pub mod week;

pub use day::DaySchedule;
pub use week::{WeekPattern, WEEKDAYS_FROM_SUNDAY};
