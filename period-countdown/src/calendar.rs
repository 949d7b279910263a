/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Calendar date → [`DaySchedule`] resolution.
//!
//! # Lookup order
//! ```text
//! date ─► week_tag(date) ─┬─ outside school year? ──► built-in holiday day
//!                         ├─ exception for tag?  ──► exception pattern[weekday]
//!                         └─ otherwise           ──► default pattern[weekday]
//! ```
//! An undefined weekday in the selected pattern resolves to *that pattern's*
//! fallback day, never to the default pattern's entry, so an exception week
//! always owns every day of its week.
//!
//! All arithmetic is on timezone-naive [`NaiveDate`]s.  Weeks run Sunday to
//! Saturday.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate};
use tracing::trace;

use crate::error::ScheduleError;
use crate::schedule::{DaySchedule, WeekPattern};

// ── Week tags ─────────────────────────────────────────────────────────────────

/// The Sunday that begins the week containing `date`.
///
/// Every date of a Sunday-to-Saturday week maps to the same tag.
pub fn week_tag(date: NaiveDate) -> NaiveDate {
    let since_sunday = date.weekday().num_days_from_sunday() as u64;
    // Only fails within a week of NaiveDate::MIN.
    date.checked_sub_days(Days::new(since_sunday)).unwrap_or(date)
}

/// Parse a `YYYY-MM-DD` week tag and normalize it to its Sunday.
pub fn parse_week_tag(input: &str) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map(week_tag)
        .map_err(|_| ScheduleError::InvalidWeekTag {
            input: input.to_string(),
        })
}

// ── SchoolYear ────────────────────────────────────────────────────────────────

/// First and last day of instruction.
///
/// Whole weeks are indexed: the year covers every date from the Sunday of
/// `first_day`'s week through the Saturday of `last_day`'s week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchoolYear {
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl SchoolYear {
    pub fn new(first_day: NaiveDate, last_day: NaiveDate) -> Result<Self, ScheduleError> {
        if first_day > last_day {
            return Err(ScheduleError::InvalidSchoolYear {
                first: first_day,
                last: last_day,
            });
        }
        Ok(Self { first_day, last_day })
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// `true` if `date`'s week overlaps the school year.
    pub fn covers_week_of(&self, date: NaiveDate) -> bool {
        let tag = week_tag(date);
        week_tag(self.first_day) <= tag && tag <= week_tag(self.last_day)
    }
}

// ── CalendarIndex ─────────────────────────────────────────────────────────────

/// Default week pattern plus per-week exceptions.
///
/// Immutable once built; share it with `Arc` and swap the whole value on
/// reload.
#[derive(Debug, Clone)]
pub struct CalendarIndex {
    default_pattern: Arc<WeekPattern>,
    /// Keyed by week tag (always a Sunday).
    week_exceptions: HashMap<NaiveDate, Arc<WeekPattern>>,
    school_year: Option<SchoolYear>,
    out_of_year: Arc<DaySchedule>,
}

impl CalendarIndex {
    pub fn new(default_pattern: Arc<WeekPattern>) -> Self {
        Self {
            default_pattern,
            week_exceptions: HashMap::new(),
            school_year: None,
            out_of_year: Arc::new(DaySchedule::holiday()),
        }
    }

    /// Builder form of [`insert_exception`](Self::insert_exception).
    pub fn with_exception(mut self, week_of: NaiveDate, pattern: Arc<WeekPattern>) -> Self {
        self.insert_exception(week_of, pattern);
        self
    }

    pub fn with_school_year(mut self, year: SchoolYear) -> Self {
        self.school_year = Some(year);
        self
    }

    /// Override the whole week containing `week_of`.
    ///
    /// `week_of` may be any day of the week; it is normalized to the week's
    /// Sunday.  Returns the exception it replaced, if any.
    pub fn insert_exception(
        &mut self,
        week_of: NaiveDate,
        pattern: Arc<WeekPattern>,
    ) -> Option<Arc<WeekPattern>> {
        self.week_exceptions.insert(week_tag(week_of), pattern)
    }

    pub fn default_pattern(&self) -> &Arc<WeekPattern> {
        &self.default_pattern
    }

    pub fn school_year(&self) -> Option<&SchoolYear> {
        self.school_year.as_ref()
    }

    /// Exception covering `date`'s week, if any.
    pub fn exception_for(&self, date: NaiveDate) -> Option<&Arc<WeekPattern>> {
        self.week_exceptions.get(&week_tag(date))
    }

    /// Number of weeks with an exception.
    pub fn exception_count(&self) -> usize {
        self.week_exceptions.len()
    }

    /// Pattern in force for `date`, or `None` outside the school year.
    pub fn pattern_for(&self, date: NaiveDate) -> Option<&Arc<WeekPattern>> {
        if let Some(year) = &self.school_year {
            if !year.covers_week_of(date) {
                return None;
            }
        }
        Some(self.exception_for(date).unwrap_or(&self.default_pattern))
    }

    /// Day schedule for `date`.  Total: every date resolves to some day.
    pub fn resolve(&self, date: NaiveDate) -> Arc<DaySchedule> {
        match self.pattern_for(date) {
            Some(pattern) => pattern.schedule_for(date.weekday()),
            None => {
                trace!(%date, "date outside school year, using holiday day");
                self.out_of_year.clone()
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn day(name: &str) -> Arc<DaySchedule> {
        Arc::new(DaySchedule::all_day_free(name))
    }

    /// DEFAULT: Mon–Fri = "A", weekend undefined.
    /// SHORT:   Mon = "H", Tue–Thu = "B", Fri undefined.
    fn index() -> CalendarIndex {
        let a = day("A");
        let default = WeekPattern::from_sunday_first(
            "DEFAULT",
            [None, Some(a.clone()), Some(a.clone()), Some(a.clone()), Some(a.clone()), Some(a), None],
        );
        let b = day("B");
        let short = WeekPattern::new("SHORT")
            .with_day(Weekday::Mon, day("H"))
            .with_day(Weekday::Tue, b.clone())
            .with_day(Weekday::Wed, b.clone())
            .with_day(Weekday::Thu, b);
        CalendarIndex::new(Arc::new(default))
            // Wednesday of the week starting Sunday 2021-11-21
            .with_exception(d(2021, 11, 24), Arc::new(short))
    }

    // ── week_tag ──────────────────────────────────────────────────────────────

    #[test]
    fn week_tag_is_the_sunday_of_the_week() {
        // 2021-09-01 is a Wednesday
        assert_eq!(week_tag(d(2021, 9, 1)), d(2021, 8, 29));
        assert_eq!(week_tag(d(2021, 8, 29)), d(2021, 8, 29));
    }

    #[test]
    fn week_tag_is_identical_across_the_week() {
        let sunday = d(2021, 12, 26);
        for offset in 0..7 {
            let date = sunday + Days::new(offset);
            assert_eq!(week_tag(date), sunday, "{date}");
        }
        assert_ne!(week_tag(sunday + Days::new(7)), sunday);
    }

    #[test]
    fn week_tag_crosses_month_and_year_boundaries() {
        // Saturday 2022-01-01 belongs to the week of Sunday 2021-12-26
        assert_eq!(week_tag(d(2022, 1, 1)), d(2021, 12, 26));
    }

    #[test]
    fn parse_week_tag_normalizes_and_rejects_garbage() {
        assert_eq!(parse_week_tag("2021-11-24").unwrap(), d(2021, 11, 21));
        assert!(matches!(
            parse_week_tag("2021-13-01"),
            Err(ScheduleError::InvalidWeekTag { .. })
        ));
        assert!(parse_week_tag("next week").is_err());
    }

    // ── resolve ───────────────────────────────────────────────────────────────

    #[test]
    fn default_pattern_applies_without_exception() {
        let idx = index();
        assert_eq!(idx.resolve(d(2021, 9, 1)).name(), "A");
    }

    #[test]
    fn saturday_without_entry_is_free_all_day() {
        let idx = index();
        let sat = idx.resolve(d(2021, 9, 4));
        assert_eq!(sat.name(), "Weekend");
        assert!(sat.is_free_all_day());
    }

    #[test]
    fn exception_overrides_every_day_of_its_week() {
        let idx = index();
        assert_eq!(idx.resolve(d(2021, 11, 22)).name(), "H");
        assert_eq!(idx.resolve(d(2021, 11, 23)).name(), "B");
        // Friday is undefined in SHORT: its own fallback wins over DEFAULT's "A".
        assert_eq!(idx.resolve(d(2021, 11, 26)).name(), "Weekend");
        // The following week is back to DEFAULT.
        assert_eq!(idx.resolve(d(2021, 11, 29)).name(), "A");
    }

    #[test]
    fn later_exception_for_same_week_replaces_earlier() {
        let mut idx = index();
        let previous = idx.insert_exception(d(2021, 11, 27), Arc::new(WeekPattern::holiday_week("HOL")));
        assert_eq!(previous.unwrap().name(), "SHORT");
        assert_eq!(idx.exception_count(), 1);
        assert_eq!(idx.resolve(d(2021, 11, 22)).name(), "Holiday");
    }

    #[test]
    fn dates_outside_school_year_resolve_to_holiday() {
        let year = SchoolYear::new(d(2021, 8, 18), d(2022, 6, 2)).unwrap();
        let idx = index().with_school_year(year);

        // Monday of the first (partial) week is still indexed.
        assert_eq!(idx.resolve(d(2021, 8, 16)).name(), "A");
        // Friday of the last week too.
        assert_eq!(idx.resolve(d(2022, 6, 3)).name(), "A");
        // Summer.
        assert_eq!(idx.resolve(d(2022, 7, 4)).name(), "Holiday");
        assert!(idx.pattern_for(d(2021, 8, 13)).is_none());
    }

    #[test]
    fn inverted_school_year_is_rejected() {
        assert!(matches!(
            SchoolYear::new(d(2022, 6, 2), d(2021, 8, 18)),
            Err(ScheduleError::InvalidSchoolYear { .. })
        ));
    }
}
