/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Timestamp queries against a [`CalendarIndex`].
//!
//! [`ScheduleResolver`] answers "what period is it, how long is left, what is
//! next" for a school-local [`NaiveDateTime`].  Every query is a pure function
//! of the index and the timestamp:
//!
//! * no query fails: a timestamp nothing covers yields the
//!   [`PeriodId::Undefined`] sentinel and a zero remaining time;
//! * the resolver owns no clock and no timer; callers pass `now` in;
//! * the resolver is `Send + Sync` and holds the index by `Arc`, so a reload
//!   never disturbs a resolver that is mid-query.
//!
//! # Example
//! ```rust,ignore
//! let resolver = ScheduleResolver::new(school.calendar());
//! let now = school.local_now();
//! println!("{} ({} left)", resolver.current_period(now), resolver.time_remaining(now));
//! ```
//!
//! [`PeriodId::Undefined`]: crate::period::PeriodId::Undefined

use std::sync::Arc;

use chrono::{Days, NaiveDate, NaiveDateTime};
use tracing::{debug, trace};

use crate::calendar::CalendarIndex;
use crate::period::Period;
use crate::schedule::DaySchedule;
use crate::time::{Duration, TimeOfDay};

// ── Constants ─────────────────────────────────────────────────────────────────

/// How far [`ScheduleResolver::next_class`] looks ahead by default, in days.
pub const DEFAULT_HORIZON_DAYS: u32 = 365;

// ── Result types ──────────────────────────────────────────────────────────────

/// Everything known about one timestamp.
#[derive(Debug, Clone)]
pub struct PeriodData {
    /// School-local calendar date of the query.
    pub date: NaiveDate,
    /// Day schedule in force on `date`.
    pub day: Arc<DaySchedule>,
    /// Period covering the query time (possibly the undefined sentinel).
    pub period: Period,
    /// Position of `period` within `day`; `None` for the sentinel.
    pub index: Option<usize>,
}

impl PeriodData {
    /// `true` when no period of `day` covers the query time.
    pub fn is_undefined(&self) -> bool {
        self.index.is_none()
    }
}

/// The next class found by [`ScheduleResolver::next_class`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upcoming {
    pub date: NaiveDate,
    pub period: Period,
    /// Time from the query instant to the class start.
    pub starts_in: Duration,
}

// ── ScheduleResolver ──────────────────────────────────────────────────────────

/// Read-only query front end over a built [`CalendarIndex`].
#[derive(Debug, Clone)]
pub struct ScheduleResolver {
    calendar: Arc<CalendarIndex>,
}

impl ScheduleResolver {
    pub fn new(calendar: Arc<CalendarIndex>) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &Arc<CalendarIndex> {
        &self.calendar
    }

    /// Day schedule in force on `date`.
    pub fn day(&self, date: NaiveDate) -> Arc<DaySchedule> {
        self.calendar.resolve(date)
    }

    /// Full snapshot for `t`: date, day, covering period and its index.
    pub fn period_data(&self, t: NaiveDateTime) -> PeriodData {
        let date = t.date();
        let day = self.calendar.resolve(date);
        let at = TimeOfDay::of(t);

        match day.period_at(at) {
            Some((index, period)) => {
                trace!(%date, %at, day = day.name(), period = %period, "resolved");
                let period = period.clone();
                PeriodData {
                    date,
                    day,
                    period,
                    index: Some(index),
                }
            }
            None => {
                debug!(%date, %at, day = day.name(), "no period covers time, returning sentinel");
                PeriodData {
                    date,
                    day,
                    period: Period::undefined(),
                    index: None,
                }
            }
        }
    }

    /// Period covering `t`, or the undefined sentinel.
    pub fn current_period(&self, t: NaiveDateTime) -> Period {
        self.period_data(t).period
    }

    /// Time from `t` until the current period ends.
    ///
    /// Zero when `t` resolves to the sentinel.  The last period of a day ends
    /// at the following midnight.
    pub fn time_remaining(&self, t: NaiveDateTime) -> Duration {
        let data = self.period_data(t);
        if data.is_undefined() {
            return Duration::ZERO;
        }
        Duration::between(t, data.period.end_on(data.date))
    }

    /// First period of `t`'s day starting at or after `t`.  Never looks past
    /// the end of the day.
    pub fn next_period_today(&self, t: NaiveDateTime) -> Option<Period> {
        let day = self.calendar.resolve(t.date());
        day.first_starting_from(TimeOfDay::of(t))
            .map(|(_, period)| period.clone())
    }

    /// Every period of `t`'s day from `t` onwards, in order.
    ///
    /// Built by chaining [`next_period_today`](Self::next_period_today): each
    /// result's end time on the same date is the next query.
    pub fn remaining_periods_today(&self, t: NaiveDateTime) -> Vec<Period> {
        let date = t.date();
        std::iter::successors(self.next_period_today(t), |prev| {
            self.next_period_today(prev.end().on(date))
        })
        .collect()
    }

    /// Next class period starting at or after `t`, looking up to
    /// `horizon_days` days ahead.
    pub fn next_class(&self, t: NaiveDateTime, horizon_days: u32) -> Option<Upcoming> {
        let today = t.date();

        for offset in 0..=horizon_days {
            let date = today.checked_add_days(Days::new(u64::from(offset)))?;
            let from = if offset == 0 {
                TimeOfDay::of(t)
            } else {
                TimeOfDay::MIDNIGHT
            };

            let day = self.calendar.resolve(date);
            let found = day
                .periods()
                .iter()
                .find(|p| p.is_counted() && p.start() >= from);

            if let Some(period) = found {
                return Some(Upcoming {
                    date,
                    period: period.clone(),
                    starts_in: Duration::between(t, period.start_on(date)),
                });
            }
        }

        debug!(horizon_days, from = %t, "no class within horizon");
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::SchoolYear;
    use crate::period::PeriodId;
    use crate::schedule::WeekPattern;
    use chrono::{NaiveTime, Weekday};

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn at(date: NaiveDate, time: &str) -> NaiveDateTime {
        t(time).on(date)
    }

    fn p(id: PeriodId, name: &str, start: &str, end: &str) -> Period {
        let end = if end == "24:00" { TimeOfDay::END_OF_DAY } else { t(end) };
        Period::new(id, name, t(start), end).unwrap()
    }

    /// `[1: 08:00-08:50], [-1: 08:50-08:55], [2: 08:55-09:45]` padded with
    /// fillers.  Used Monday to Friday; weekends undefined.
    fn resolver() -> ScheduleResolver {
        let a = Arc::new(
            DaySchedule::build(
                "A",
                vec![
                    p(PeriodId::Filler, "Before School", "00:00", "08:00"),
                    p(PeriodId::Class(1), "Period 1", "08:00", "08:50"),
                    p(PeriodId::Filler, "Passing", "08:50", "08:55"),
                    p(PeriodId::Class(2), "Period 2", "08:55", "09:45"),
                    p(PeriodId::Filler, "After School", "09:45", "24:00"),
                ],
            )
            .unwrap(),
        );
        let week = [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]
            .into_iter()
            .fold(WeekPattern::new("DEFAULT"), |w, wd| w.with_day(wd, a.clone()));
        ScheduleResolver::new(Arc::new(CalendarIndex::new(Arc::new(week))))
    }

    /// A Wednesday.
    fn wed() -> NaiveDate {
        d(2021, 9, 1)
    }

    // ── current_period / time_remaining ───────────────────────────────────────

    #[test]
    fn passing_period_scenario() {
        let r = resolver();
        let now = at(wed(), "08:52");

        let current = r.current_period(now);
        assert_eq!(current.id(), PeriodId::Filler);
        assert_eq!(current.name(), "Passing");

        let left = r.time_remaining(now);
        assert_eq!(left.total_millis(), 3 * 60 * 1000);
        assert_eq!(left.to_string(), "03:00");

        let next = r.next_period_today(now).unwrap();
        assert_eq!(next.id(), PeriodId::Class(2));
    }

    #[test]
    fn boundary_instant_belongs_to_the_later_period() {
        let r = resolver();
        assert_eq!(r.current_period(at(wed(), "08:50")).id(), PeriodId::Filler);
        assert_eq!(r.current_period(at(wed(), "08:49:59.999")).id(), PeriodId::Class(1));
    }

    #[test]
    fn last_period_runs_until_next_midnight() {
        let r = resolver();
        let now = at(wed(), "23:00");
        assert_eq!(r.current_period(now).name(), "After School");
        assert_eq!(r.time_remaining(now).to_string(), "1:00:00");

        let final_ms = TimeOfDay::END_OF_DAY.on(wed());
        assert_eq!(r.time_remaining(final_ms).total_millis(), 1);
    }

    #[test]
    fn every_sampled_timestamp_resolves_to_a_period() {
        let r = resolver();
        for offset in 0..14 {
            let date = d(2021, 8, 29) + Days::new(offset);
            for minute in (0..24 * 60).step_by(7) {
                let time = NaiveTime::from_num_seconds_from_midnight_opt(minute * 60, 0).unwrap();
                let now = date.and_time(time);
                let data = r.period_data(now);
                assert!(!data.is_undefined(), "{now}");
                assert!(data.period.contains(TimeOfDay::of(now)));
                // Never negative; never longer than a day.
                assert!(r.time_remaining(now).total_millis() <= 24 * 60 * 60 * 1000);
            }
        }
    }

    #[test]
    fn queries_at_the_end_of_the_calendar_do_not_overflow() {
        let r = ScheduleResolver::new(Arc::new(CalendarIndex::new(Arc::new(WeekPattern::new("EMPTY")))));
        let last = NaiveDateTime::MAX;

        assert_eq!(r.current_period(last).name(), "Weekend");
        assert!(r.time_remaining(last).is_zero());
        assert!(r.next_period_today(last).is_none());
        assert!(r.next_class(last, DEFAULT_HORIZON_DAYS).is_none());

        let noon = at(NaiveDate::MAX, "12:00");
        assert_eq!(r.time_remaining(noon).to_string(), "11:59:59");
    }

    // ── thread safety ─────────────────────────────────────────────────────────

    #[test]
    fn query_types_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScheduleResolver>();
        assert_send_sync::<CalendarIndex>();
        assert_send_sync::<PeriodData>();
    }

    // ── Saturday ──────────────────────────────────────────────────────────────

    #[test]
    fn saturday_is_free_at_any_time() {
        let r = resolver();
        let sat = d(2021, 9, 4);
        for time in ["00:00", "08:52", "12:00", "23:59:59.999"] {
            let period = r.current_period(at(sat, time));
            assert!(period.is_free(), "{time}");
            assert_eq!(period.name(), "Weekend");
        }
        assert!(r.day(sat).is_free_all_day());
    }

    // ── chaining ──────────────────────────────────────────────────────────────

    #[test]
    fn chaining_enumerates_the_whole_day() {
        let r = resolver();
        let mut cursor = TimeOfDay::MIDNIGHT.on(wed());
        let mut seen = Vec::new();
        while let Some(next) = r.next_period_today(cursor) {
            cursor = next.end().on(wed());
            seen.push(next);
        }
        let names: Vec<&str> = seen.iter().map(Period::name).collect();
        assert_eq!(
            names,
            ["Before School", "Period 1", "Passing", "Period 2", "After School"]
        );
        assert_eq!(seen, r.day(wed()).periods());
    }

    #[test]
    fn remaining_periods_today_starts_after_now() {
        let r = resolver();
        let rest = r.remaining_periods_today(at(wed(), "08:52"));
        let ids: Vec<PeriodId> = rest.iter().map(Period::id).collect();
        assert_eq!(ids, [PeriodId::Class(2), PeriodId::Filler]);
        assert!(r.remaining_periods_today(at(wed(), "10:00")).is_empty());
    }

    // ── next_class ────────────────────────────────────────────────────────────

    #[test]
    fn next_class_same_day() {
        let r = resolver();
        let up = r.next_class(at(wed(), "08:52"), DEFAULT_HORIZON_DAYS).unwrap();
        assert_eq!(up.date, wed());
        assert_eq!(up.period.id(), PeriodId::Class(2));
        assert_eq!(up.starts_in.to_string(), "03:00");
    }

    #[test]
    fn next_class_skips_the_weekend() {
        let r = resolver();
        // Friday after school
        let up = r.next_class(at(d(2021, 9, 3), "10:00"), DEFAULT_HORIZON_DAYS).unwrap();
        assert_eq!(up.date, d(2021, 9, 6));
        assert_eq!(up.period.id(), PeriodId::Class(1));
        // Fri 10:00 → Mon 08:00 = 2 days 22 hours
        assert_eq!(up.starts_in.days(), 2);
        assert_eq!(up.starts_in.hours(), 22);
    }

    #[test]
    fn next_class_respects_horizon() {
        let r = resolver();
        assert!(r.next_class(at(d(2021, 9, 3), "10:00"), 2).is_none());
    }

    #[test]
    fn next_class_gives_up_outside_school_year() {
        let index = CalendarIndex::clone(resolver().calendar())
            .with_school_year(SchoolYear::new(d(2021, 8, 18), d(2021, 9, 3)).unwrap());
        let r = ScheduleResolver::new(Arc::new(index));
        assert!(r.next_class(at(d(2021, 9, 3), "10:00"), 30).is_none());
        assert_eq!(r.current_period(at(d(2021, 9, 8), "08:30")).name(), "Holiday");
    }
}
