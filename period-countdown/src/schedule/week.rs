/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! [`WeekPattern`]: one "type" of week (normal week, 4-day week, holiday week).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Weekday;

use super::DaySchedule;

/// Weekdays in the Sunday-first order used by school files and week tags.
pub const WEEKDAYS_FROM_SUNDAY: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Weekday → [`DaySchedule`] mapping.
///
/// A pattern need not define every weekday.  Undefined weekdays resolve to the
/// pattern's own `fallback` day, which is the built-in weekend day unless the
/// pattern was built with [`WeekPattern::with_fallback`].
#[derive(Debug, Clone)]
pub struct WeekPattern {
    name: String,
    days: HashMap<Weekday, Arc<DaySchedule>>,
    fallback: Arc<DaySchedule>,
}

impl WeekPattern {
    /// Empty pattern: every weekday falls back to the weekend day.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            days: HashMap::new(),
            fallback: Arc::new(DaySchedule::weekend()),
        }
    }

    /// Pattern with no school days whose fallback is the holiday day.
    pub fn holiday_week(name: impl Into<String>) -> Self {
        Self::new(name).with_fallback(Arc::new(DaySchedule::holiday()))
    }

    /// Build from seven Sunday-first slots; `None` leaves a weekday undefined.
    pub fn from_sunday_first(
        name: impl Into<String>,
        slots: impl IntoIterator<Item = Option<Arc<DaySchedule>>>,
    ) -> Self {
        WEEKDAYS_FROM_SUNDAY
            .into_iter()
            .zip(slots)
            .fold(Self::new(name), |week, (weekday, slot)| match slot {
                Some(day) => week.with_day(weekday, day),
                None => week,
            })
    }

    pub fn with_day(mut self, weekday: Weekday, day: Arc<DaySchedule>) -> Self {
        self.days.insert(weekday, day);
        self
    }

    pub fn with_fallback(mut self, fallback: Arc<DaySchedule>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Explicitly defined day, if any.
    pub fn day(&self, weekday: Weekday) -> Option<&Arc<DaySchedule>> {
        self.days.get(&weekday)
    }

    /// Day to use for `weekday`, falling back for undefined weekdays.
    pub fn schedule_for(&self, weekday: Weekday) -> Arc<DaySchedule> {
        self.days
            .get(&weekday)
            .unwrap_or(&self.fallback)
            .clone()
    }

    pub fn fallback(&self) -> &Arc<DaySchedule> {
        &self.fallback
    }

    pub fn defined_days(&self) -> usize {
        self.days.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn school_day(name: &str) -> Arc<DaySchedule> {
        // Any day shape will do; only identity matters here.
        Arc::new(DaySchedule::all_day_free(name))
    }

    #[test]
    fn from_sunday_first_maps_slots_in_order() {
        let a = school_day("A");
        let week = WeekPattern::from_sunday_first(
            "DEFAULT",
            [None, Some(a.clone()), Some(a.clone()), Some(a.clone()), Some(a.clone()), Some(a), None],
        );
        assert_eq!(week.defined_days(), 5);
        assert!(week.day(Weekday::Sun).is_none());
        assert_eq!(week.day(Weekday::Mon).unwrap().name(), "A");
        assert!(week.day(Weekday::Sat).is_none());
    }

    #[test]
    fn undefined_weekday_uses_weekend_fallback() {
        let week = WeekPattern::new("empty");
        assert_eq!(week.schedule_for(Weekday::Wed).name(), "Weekend");
        assert!(week.schedule_for(Weekday::Wed).is_free_all_day());
    }

    #[test]
    fn holiday_week_falls_back_to_holiday() {
        let week = WeekPattern::holiday_week("HOLIDAY");
        assert_eq!(week.defined_days(), 0);
        assert_eq!(week.schedule_for(Weekday::Mon).name(), "Holiday");
    }

    #[test]
    fn schedule_for_shares_the_defined_day() {
        let a = school_day("A");
        let week = WeekPattern::new("w").with_day(Weekday::Tue, a.clone());
        assert!(Arc::ptr_eq(&week.schedule_for(Weekday::Tue), &a));
    }
}
