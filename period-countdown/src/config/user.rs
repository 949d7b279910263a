/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-user display overlay.
//!
//! A school file only knows "Period 3".  The user file says what period 3 is
//! for one student:
//!
//! ```yaml
//! periods:
//!   1: { name: "Chemistry", teacher: "Ms. Rivera", room: "204" }
//!   2: { name: "Free" }          # Free / None / N/A mark a free period
//!   "3": { name: "Calculus" }    # quoted keys work too
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use super::RawCode;
use crate::period::{Period, PeriodId};

// ── Private YAML deserialization types ────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct UserFile {
    #[serde(default)]
    periods: BTreeMap<RawCode, ClassEntryFile>,
}

#[derive(Debug, Deserialize)]
struct ClassEntryFile {
    name: String,
    teacher: Option<String>,
    room: Option<String>,
}

// ── Public data structures ────────────────────────────────────────────────────

/// What one class number means for this user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    pub name: String,
    pub teacher: Option<String>,
    pub room: Option<String>,
}

impl ClassEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            teacher: None,
            room: None,
        }
    }

    /// `true` if the user marked this class as a free period.
    pub fn is_free(&self) -> bool {
        is_free_name(&self.name)
    }
}

/// Display text for one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodLabel {
    /// Main line: class name, or the period name for free periods.
    pub name: String,
    /// Secondary line: `"Free"`, `"???"`, or the period name for classes.
    pub status: String,
    pub teacher: Option<String>,
    pub room: Option<String>,
}

impl PeriodLabel {
    fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
            teacher: None,
            room: None,
        }
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.status)?;
        match (&self.teacher, &self.room) {
            (Some(teacher), Some(room)) => write!(f, " - {teacher}, room {room}"),
            (Some(teacher), None) => write!(f, " - {teacher}"),
            (None, Some(room)) => write!(f, " - room {room}"),
            (None, None) => Ok(()),
        }
    }
}

/// Case-insensitive match on the names users give to free periods.
pub fn is_free_name(name: &str) -> bool {
    ["free", "none", "n/a"]
        .iter()
        .any(|free| name.trim().eq_ignore_ascii_case(free))
}

// ── UserOverlay ───────────────────────────────────────────────────────────────

/// Class number → [`ClassEntry`] for one user.
#[derive(Debug, Clone, Default)]
pub struct UserOverlay {
    classes: HashMap<u32, ClassEntry>,
}

impl UserOverlay {
    /// An overlay with no entries: every class labels as `???`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: u32, entry: ClassEntry) -> Self {
        self.classes.insert(class, entry);
        self
    }

    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is malformed, or a
    /// key is not a class number.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading user overlay from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open user file: {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid user file: {}", path.display()))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: UserFile = serde_yaml::from_str(yaml).context("Failed to parse user YAML")?;

        let mut overlay = Self::new();
        for (key, entry) in file.periods {
            let class = key
                .class_number()
                .ok_or_else(|| anyhow!("'{key}' is not a class number"))?;
            debug!(class, name = %entry.name, "  user class");
            overlay.classes.insert(
                class,
                ClassEntry {
                    name: entry.name,
                    teacher: entry.teacher,
                    room: entry.room,
                },
            );
        }

        info!("Loaded {} user class entries", overlay.classes.len());
        Ok(overlay)
    }

    pub fn entry(&self, class: u32) -> Option<&ClassEntry> {
        self.classes.get(&class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Display label for `period`.
    pub fn label(&self, period: &Period) -> PeriodLabel {
        let class = match period.id() {
            PeriodId::Undefined => return PeriodLabel::new("Summer", "Free"),
            PeriodId::Filler | PeriodId::Special => return PeriodLabel::new(period.name(), "Free"),
            PeriodId::Class(n) => n,
        };

        match self.classes.get(&class) {
            None => PeriodLabel::new("???", "???"),
            Some(entry) if entry.is_free() => PeriodLabel::new(period.name(), "Free"),
            Some(entry) => PeriodLabel {
                name: entry.name.clone(),
                status: period.name().to_string(),
                teacher: entry.teacher.clone(),
                room: entry.room.clone(),
            },
        }
    }

    /// `true` for filler periods and for classes this user has off.
    pub fn is_free(&self, period: &Period) -> bool {
        period.is_free()
            || period
                .id()
                .class_number()
                .and_then(|n| self.classes.get(&n))
                .is_some_and(ClassEntry::is_free)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
