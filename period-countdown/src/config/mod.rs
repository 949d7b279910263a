/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! School definition loading and management.
//!
//! The expected YAML structure is:
//! ```yaml
//! info:
//!   name: "Mountain View High School"
//!   timezone: "America/Los_Angeles"
//!   first_period: 0
//!   last_period: 7
//!   first_day: 2021-08-16      # optional
//!   last_day: 2022-06-02       # optional
//!   default_week: DEFAULT      # optional
//! days:
//!   A:
//!     - { type: nothing, name: "Before School", start: "00:00", end: "08:00" }
//!     - { type: 1,       name: "Period 1",      start: "08:00", end: "08:50" }
//!     - { type: nothing, name: "After School",  start: "08:50", end: "23:59" }
//! weeks:
//!   DEFAULT: [~, A, A, A, A, A, ~]    # Sunday .. Saturday
//!   HOLIDAY: [~, ~, ~, ~, ~, ~, ~]
//! exceptions:
//!   - { week: HOLIDAY, week_tag: 2021-11-24 }
//! ```
//!
//! The last period of a day may end at `23:59` or `24:00`; both mean the end of
//! the day (`23:59:59.999`).  Anywhere else `23:59` is an ordinary time.
//!
//! Loading is all-or-nothing: the whole file is parsed and validated into a
//! new [`School`] before anything else sees it.

pub mod user;

pub use user::{ClassEntry, PeriodLabel, UserOverlay};

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::calendar::{parse_week_tag, CalendarIndex, SchoolYear};
use crate::error::ScheduleError;
use crate::period::{Period, PeriodId};
use crate::resolver::ScheduleResolver;
use crate::schedule::{DaySchedule, WeekPattern};
use crate::time::TimeOfDay;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
///
/// `BTreeMap` keeps validation order stable, so the same broken file always
/// reports the same first error.
#[derive(Debug, Deserialize)]
struct SchoolFile {
    info: InfoEntry,
    #[serde(default)]
    days: BTreeMap<String, Vec<PeriodEntry>>,
    #[serde(default)]
    weeks: BTreeMap<String, Vec<Option<String>>>,
    #[serde(default)]
    exceptions: Vec<ExceptionEntry>,
}

#[derive(Debug, Deserialize)]
struct InfoEntry {
    name: String,
    timezone: String,
    first_period: u32,
    last_period: u32,
    first_day: Option<NaiveDate>,
    last_day: Option<NaiveDate>,
    #[serde(default = "default_week_name")]
    default_week: String,
}

fn default_week_name() -> String {
    String::from("DEFAULT")
}

#[derive(Debug, Deserialize)]
struct PeriodEntry {
    #[serde(rename = "type")]
    kind: RawCode,
    name: String,
    start: String,
    end: String,
}

#[derive(Debug, Deserialize)]
struct ExceptionEntry {
    week: String,
    week_tag: String,
}

/// A YAML scalar that is either an integer or a string.
///
/// Period types (`1`, `-1`, `nothing`) and user-file keys (`1`, `"1"`) both
/// come in either form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawCode {
    Number(i64),
    Text(String),
}

impl RawCode {
    /// Non-negative integer value, accepting numeric strings.
    pub(crate) fn class_number(&self) -> Option<u32> {
        match self {
            RawCode::Number(n) => u32::try_from(*n).ok(),
            RawCode::Text(s) => s.trim().parse().ok(),
        }
    }

    fn period_id(&self) -> Result<PeriodId, ScheduleError> {
        match self {
            RawCode::Number(n) => PeriodId::from_raw(*n),
            RawCode::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "nothing" => Ok(PeriodId::Filler),
                "special" => Ok(PeriodId::Special),
                other => other
                    .parse::<i64>()
                    .map_err(|_| ScheduleError::UnknownPeriodType { value: s.clone() })
                    .and_then(PeriodId::from_raw),
            },
        }
    }
}

impl fmt::Display for RawCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCode::Number(n) => write!(f, "{n}"),
            RawCode::Text(s) => f.write_str(s),
        }
    }
}

// ── Public data structures ────────────────────────────────────────────────────

/// The `info:` block of a school file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolInfo {
    pub name: String,
    pub timezone: Tz,
    /// Lowest class number a day may use.
    pub first_period: u32,
    /// Highest class number a day may use.
    pub last_period: u32,
    pub school_year: Option<SchoolYear>,
    pub default_week: String,
}

/// A loaded school: its info block plus the built calendar.
#[derive(Debug, Clone)]
pub struct School {
    info: SchoolInfo,
    calendar: Arc<CalendarIndex>,
}

impl School {
    /// Parse and validate the school file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, the YAML is structurally
    /// invalid, or the definition breaks a schedule rule (the chain then ends
    /// in a [`ScheduleError`]).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading school definition from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open school file: {}", path.display()))?;

        let file: SchoolFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

        Self::build(file)
            .with_context(|| format!("Invalid school definition: {}", path.display()))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: SchoolFile = serde_yaml::from_str(yaml).context("Failed to parse school YAML")?;
        Self::build(file).context("Invalid school definition")
    }

    pub fn info(&self) -> &SchoolInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn timezone(&self) -> Tz {
        self.info.timezone
    }

    pub fn calendar(&self) -> Arc<CalendarIndex> {
        self.calendar.clone()
    }

    pub fn resolver(&self) -> ScheduleResolver {
        ScheduleResolver::new(self.calendar.clone())
    }

    /// School-local wall clock for an instant.
    pub fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.info.timezone).naive_local()
    }

    /// School-local wall clock right now.
    pub fn local_now(&self) -> NaiveDateTime {
        self.to_local(Utc::now())
    }

    // ── Build ─────────────────────────────────────────────────────────────────

    fn build(file: SchoolFile) -> Result<Self, ScheduleError> {
        let info = build_info(file.info)?;

        let mut days: BTreeMap<String, Arc<DaySchedule>> = BTreeMap::new();
        for (name, entries) in file.days {
            let day = build_day(&info, &name, entries)?;
            debug!("  Day: {} | periods: {}", name, day.periods().len());
            days.insert(name, Arc::new(day));
        }

        let mut weeks: BTreeMap<String, Arc<WeekPattern>> = BTreeMap::new();
        for (name, slots) in file.weeks {
            let week = build_week(&days, &name, slots)?;
            debug!("  Week: {} | school days: {}", name, week.defined_days());
            weeks.insert(name, Arc::new(week));
        }

        let default = weeks
            .get(&info.default_week)
            .cloned()
            .ok_or_else(|| ScheduleError::MissingDefaultWeek {
                name: info.default_week.clone(),
            })?;

        let mut calendar = CalendarIndex::new(default);
        for exception in file.exceptions {
            let week_tag = parse_week_tag(&exception.week_tag)?;
            let pattern = weeks.get(&exception.week).cloned().ok_or_else(|| {
                ScheduleError::UnknownExceptionWeek {
                    week: exception.week.clone(),
                    week_tag,
                }
            })?;
            if let Some(replaced) = calendar.insert_exception(week_tag, pattern) {
                warn!(
                    %week_tag,
                    replaced = replaced.name(),
                    by = %exception.week,
                    "Duplicate exception for week, keeping the later entry"
                );
            }
        }
        if let Some(year) = info.school_year {
            calendar = calendar.with_school_year(year);
        }

        info!(
            school = %info.name,
            timezone = %info.timezone,
            days = days.len(),
            weeks = weeks.len(),
            exceptions = calendar.exception_count(),
            "Successfully loaded school definition"
        );

        Ok(Self {
            info,
            calendar: Arc::new(calendar),
        })
    }
}

fn build_info(raw: InfoEntry) -> Result<SchoolInfo, ScheduleError> {
    let timezone = raw
        .timezone
        .trim()
        .parse::<Tz>()
        .map_err(|_| ScheduleError::UnknownTimezone {
            name: raw.timezone.clone(),
        })?;

    if raw.first_period > raw.last_period {
        return Err(ScheduleError::InvalidClassRange {
            first: raw.first_period,
            last: raw.last_period,
        });
    }

    let school_year = match (raw.first_day, raw.last_day) {
        (Some(first), Some(last)) => Some(SchoolYear::new(first, last)?),
        (None, None) => None,
        (first, last) => {
            warn!(
                ?first,
                ?last,
                "School year needs both first_day and last_day, ignoring bounds"
            );
            None
        }
    };

    Ok(SchoolInfo {
        name: raw.name,
        timezone,
        first_period: raw.first_period,
        last_period: raw.last_period,
        school_year,
        default_week: raw.default_week,
    })
}

fn build_day(
    info: &SchoolInfo,
    day: &str,
    entries: Vec<PeriodEntry>,
) -> Result<DaySchedule, ScheduleError> {
    let count = entries.len();
    let mut periods = Vec::with_capacity(count);
    for (position, entry) in entries.into_iter().enumerate() {
        let id = entry.kind.period_id()?;
        if let PeriodId::Class(class) = id {
            if class < info.first_period || class > info.last_period {
                return Err(ScheduleError::ClassOutOfRange {
                    day: day.to_string(),
                    class,
                    first: info.first_period,
                    last: info.last_period,
                });
            }
        }

        let start = parse_time(&entry.start, day, &entry.name, "start")?;
        let end = parse_end_time(&entry.end, day, &entry.name, position + 1 == count)?;
        periods.push(Period::new(id, entry.name, start, end)?);
    }
    DaySchedule::build(day, periods)
}

fn build_week(
    days: &BTreeMap<String, Arc<DaySchedule>>,
    week: &str,
    slots: Vec<Option<String>>,
) -> Result<WeekPattern, ScheduleError> {
    if slots.len() != 7 {
        return Err(ScheduleError::WrongWeekLength {
            week: week.to_string(),
            len: slots.len(),
        });
    }

    let resolved = slots
        .into_iter()
        .map(|slot| match slot {
            None => Ok(None),
            Some(name) => days.get(&name).cloned().map(Some).ok_or_else(|| {
                ScheduleError::UnknownDay {
                    week: week.to_string(),
                    day: name,
                }
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    // A week with no school days at all is a break.
    if resolved.iter().all(Option::is_none) {
        return Ok(WeekPattern::holiday_week(week));
    }
    Ok(WeekPattern::from_sunday_first(week, resolved))
}

fn parse_time(raw: &str, day: &str, period: &str, field: &str) -> Result<TimeOfDay, ScheduleError> {
    TimeOfDay::parse(raw).map_err(|source| ScheduleError::InvalidTime {
        context: format!("day '{day}', period '{period}', {field}"),
        source,
    })
}

/// `24:00` always closes the day; `23:59` only does so on a day's last entry.
fn parse_end_time(
    raw: &str,
    day: &str,
    period: &str,
    last_entry: bool,
) -> Result<TimeOfDay, ScheduleError> {
    match raw.trim() {
        "24:00" => Ok(TimeOfDay::END_OF_DAY),
        "23:59" if last_entry => Ok(TimeOfDay::END_OF_DAY),
        _ => parse_time(raw, day, period, "end"),
    }
}

// ── SchoolManager ─────────────────────────────────────────────────────────────

/// Holds the active [`School`] and swaps it atomically on reload.
///
/// Readers take an `Arc` snapshot with [`current`](Self::current) and query it
/// without holding the lock.  A failed reload leaves the active school
/// untouched.
#[derive(Debug, Default)]
pub struct SchoolManager {
    active: RwLock<Option<Arc<School>>>,
}

impl SchoolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path` and make it the active school.
    pub fn load_from_file(&self, path: &Path) -> Result<Arc<School>> {
        self.reload_from_file(path)?;
        self.current()
            .context("School definition vanished right after loading")
    }

    /// Load `path` and swap it in, returning the school it replaced.
    ///
    /// The new file is fully parsed and validated before the swap.
    ///
    /// # Errors
    /// Any load error; the previously active school stays in effect.
    pub fn reload_from_file(&self, path: &Path) -> Result<Option<Arc<School>>> {
        let school = match School::load_from_file(path) {
            Ok(school) => Arc::new(school),
            Err(e) => {
                if self.is_loaded() {
                    warn!("Reload failed, keeping the current school definition");
                }
                return Err(e);
            }
        };
        Ok(self.replace(school))
    }

    /// Swap in an already built school.
    pub fn replace(&self, school: Arc<School>) -> Option<Arc<School>> {
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        let previous = active.replace(school);
        if let Some(prev) = &previous {
            info!("Replaced school definition '{}'", prev.name());
        }
        previous
    }

    /// Snapshot of the active school.
    pub fn current(&self) -> Option<Arc<School>> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resolver bound to the active school's calendar.
    pub fn resolver(&self) -> Option<ScheduleResolver> {
        self.current().map(|school| school.resolver())
    }

    pub fn is_loaded(&self) -> bool {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
