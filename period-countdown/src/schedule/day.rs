/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! [`DaySchedule`]: the gap-free sequence of periods for one day.

use std::fmt;

use crate::error::ScheduleError;
use crate::period::{Period, PeriodId};
use crate::time::TimeOfDay;

/// Ordered, contiguous, day-covering list of [`Period`]s.
///
/// # Invariants
/// * the first period starts at `00:00:00.000`;
/// * each period ends exactly where the next one starts;
/// * the last period ends at `23:59:59.999`;
/// * no two adjacent periods are both [`PeriodId::Filler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySchedule {
    name: String,
    periods: Vec<Period>,
}

impl DaySchedule {
    /// Validate `raw` and build the day, collapsing runs of adjacent filler
    /// periods.
    ///
    /// Filler merging keeps the first period's name and stretches it to the
    /// end of the run.  [`PeriodId::Special`] periods are never merged, not even
    /// with each other.
    ///
    /// # Errors
    /// The first coverage violation found, scanning left to right.
    pub fn build(
        name: impl Into<String>,
        raw: impl IntoIterator<Item = Period>,
    ) -> Result<Self, ScheduleError> {
        let name = name.into();
        let raw: Vec<Period> = raw.into_iter().collect();

        check_coverage(&name, &raw)?;
        let periods = merge_fillers(raw);
        debug_assert!(check_coverage(&name, &periods).is_ok());

        Ok(Self { name, periods })
    }

    /// Built-in day used for weekdays a week pattern leaves undefined.
    pub fn weekend() -> Self {
        Self::all_day_free("Weekend")
    }

    /// Built-in day used for holiday weeks and dates outside the school year.
    pub fn holiday() -> Self {
        Self::all_day_free("Holiday")
    }

    /// A day made of one free period named like the day.
    pub fn all_day_free(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            periods: vec![Period::all_day(name.clone())],
            name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// `true` when no period of the day is a class.
    pub fn is_free_all_day(&self) -> bool {
        self.periods.iter().all(Period::is_free)
    }

    /// Index and period covering `t`.
    ///
    /// Binary search on start times.  `None` only for a day that breaks the
    /// coverage invariant, which [`build`](Self::build) never produces.
    pub fn period_at(&self, t: TimeOfDay) -> Option<(usize, &Period)> {
        let after = self.periods.partition_point(|p| p.start() <= t);
        let index = after.checked_sub(1)?;
        let period = &self.periods[index];
        period.contains(t).then_some((index, period))
    }

    /// First period whose start is at or after `t`.
    pub fn first_starting_from(&self, t: TimeOfDay) -> Option<(usize, &Period)> {
        let index = self.periods.partition_point(|p| p.start() < t);
        self.periods.get(index).map(|p| (index, p))
    }
}

impl fmt::Display for DaySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} periods)", self.name, self.periods.len())
    }
}

/// Single left-to-right pass; `O(n)`.
fn merge_fillers(raw: Vec<Period>) -> Vec<Period> {
    let mut merged: Vec<Period> = Vec::with_capacity(raw.len());
    for period in raw {
        match merged.last_mut() {
            Some(prev) if prev.id() == PeriodId::Filler && period.id() == PeriodId::Filler => {
                *prev = prev.extended_to(prev.end().max(period.end()));
            }
            _ => merged.push(period),
        }
    }
    merged
}

fn check_coverage(day: &str, periods: &[Period]) -> Result<(), ScheduleError> {
    let (Some(first), Some(last)) = (periods.first(), periods.last()) else {
        return Err(ScheduleError::EmptyDay {
            day: day.to_string(),
        });
    };

    if first.start() != TimeOfDay::MIDNIGHT {
        return Err(ScheduleError::DayStartsLate {
            day: day.to_string(),
            start: first.start(),
        });
    }

    for pair in periods.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if b.start() == a.end() {
            continue;
        }
        let (before, end, after, start) = (a.name().to_string(), a.end(), b.name().to_string(), b.start());
        let day = day.to_string();
        return Err(if b.start() > a.end() {
            ScheduleError::Gap {
                day,
                before,
                end,
                after,
                start,
            }
        } else {
            ScheduleError::Overlap {
                day,
                before,
                end,
                after,
                start,
            }
        });
    }

    if !last.is_last() {
        return Err(ScheduleError::DayEndsEarly {
            day: day.to_string(),
            end: last.end(),
        });
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
