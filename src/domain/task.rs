//! Task domain model
//!
//! A task is a flat record with two independent lifecycle flags
//! (`done`, `canceled`). Identity is not part of the record: a task's
//! id is its 1-based position in the stored sequence.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Priority level of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    High,
}

impl Priority {
    /// Returns the lowercase label used on disk and in listings
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for priority values outside {low, high}
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid priority '{0}', expected 'low' or 'high'")]
pub struct InvalidPriority(String);

impl FromStr for Priority {
    type Err = InvalidPriority;

    // Case-insensitive: "High" and "HIGH" are accepted at the boundary,
    // stored lowercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "high" => Ok(Priority::High),
            _ => Err(InvalidPriority(s.to_string())),
        }
    }
}

/// Error for a due-delta request without both dates
#[derive(Debug, Error, PartialEq, Eq)]
#[error("start and end dates are both required")]
pub struct MissingDates;

/// Signed day count from `start` to `end` (negative if `end` precedes
/// `start`). Either date absent means there is nothing to compute.
pub fn due_delta(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<i64, MissingDates> {
    match (start, end) {
        (Some(start), Some(end)) => Ok(end.signed_duration_since(start).num_days()),
        _ => Err(MissingDates),
    }
}

/// A single unit of work
///
/// All seven fields are persisted on every record; none are skipped
/// when absent, so the on-disk layout is stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Human-readable title
    pub title: String,

    /// Free-form description, empty when not supplied
    #[serde(default)]
    pub description: String,

    /// When work starts; defaults to the creation date
    pub start_date: NaiveDate,

    /// Optional target date
    pub end_date: Option<NaiveDate>,

    /// Completion flag
    #[serde(default)]
    pub done: bool,

    /// Priority level
    #[serde(default)]
    pub priority: Priority,

    /// Cancellation flag, independent of `done`
    #[serde(default)]
    pub canceled: bool,
}

impl Task {
    /// Creates a task with the given title and today's date, all other
    /// fields at their defaults
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            start_date: Local::now().date_naive(),
            end_date: None,
            done: false,
            priority: Priority::Low,
            canceled: false,
        }
    }

    /// Returns true if the task is neither done nor canceled
    pub fn is_pending(&self) -> bool {
        !self.done && !self.canceled
    }

    /// Sets the done flag. Returns false if it was already set; the
    /// canceled flag is never touched.
    pub fn mark_done(&mut self) -> bool {
        if self.done {
            return false;
        }
        self.done = true;
        true
    }

    /// Sets the canceled flag. Returns false if it was already set; the
    /// done flag is never touched.
    pub fn cancel(&mut self) -> bool {
        if self.canceled {
            return false;
        }
        self.canceled = true;
        true
    }

    /// Days from the start date to the end date, if an end date is set
    pub fn due_delta(&self) -> Result<i64, MissingDates> {
        due_delta(Some(self.start_date), self.end_date)
    }
}
