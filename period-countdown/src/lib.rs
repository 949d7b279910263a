/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Period Countdown – school bell-schedule resolver
//!
//! Answers "which period is it, how long until it ends, what comes next" for
//! a school-local timestamp, from a YAML school definition.
//!
//! ```text
//! lib.rs
//! ├── time/       – TimeOfDay (ms since midnight) + Duration countdown value
//! ├── period      – PeriodId tagged variant, Period record
//! ├── schedule/   – DaySchedule (merge + coverage) and WeekPattern
//! ├── calendar    – week tags, CalendarIndex (exceptions, school year)
//! ├── resolver/   – ScheduleResolver timestamp queries
//! ├── config/     – YAML school loader, SchoolManager, user overlay
//! └── error       – ScheduleError load-time taxonomy
//! ```

pub mod calendar;
pub mod config;
pub mod error;
pub mod period;
pub mod resolver;
pub mod schedule;
pub mod time;

pub use calendar::{week_tag, CalendarIndex, SchoolYear};
pub use config::{School, SchoolInfo, SchoolManager, UserOverlay};
pub use error::ScheduleError;
pub use period::{Period, PeriodId};
pub use resolver::{PeriodData, ScheduleResolver, Upcoming};
pub use schedule::{DaySchedule, WeekPattern};
pub use time::{Duration, TimeOfDay};
