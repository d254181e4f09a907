//! Task model: a unit of work to be placed somewhere inside its date window.

use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::slot::SLOT_MINUTES;

/// Weight of priority in the composite score.
pub const PRIORITY_WEIGHT: f64 = 0.6;
/// Weight of difficulty in the composite score.
pub const DIFFICULTY_WEIGHT: f64 = 0.4;

/// Core task type.
///
/// The window `start_date..=due_date` is inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,

    /// May be split into chunks across slots and days.
    #[serde(default)]
    pub chunkable: bool,

    /// 1-5.
    #[serde(default = "default_rating")]
    pub priority: u8,

    /// 1-5.
    #[serde(default = "default_rating")]
    pub difficulty: u8,

    /// Minutes. Must be a positive multiple of the slot length.
    pub duration_minutes: u32,

    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

fn default_rating() -> u8 {
    3
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        duration_minutes: u32,
        start_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            chunkable: false,
            priority: default_rating(),
            difficulty: default_rating(),
            duration_minutes,
            start_date,
            due_date,
        }
    }

    pub fn chunkable(mut self) -> Self {
        self.chunkable = true;
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// `0.6 * priority + 0.4 * difficulty`. The fallback pass places lower scores first.
    pub fn composite_score(&self) -> f64 {
        PRIORITY_WEIGHT * f64::from(self.priority) + DIFFICULTY_WEIGHT * f64::from(self.difficulty)
    }

    pub fn in_window(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.due_date
    }

    /// Boundary validation. Durations are rejected rather than rounded.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("task name must not be empty");
        }
        if self.duration_minutes == 0 || self.duration_minutes % SLOT_MINUTES != 0 {
            bail!(
                "task '{}': duration {} is not a positive multiple of {} minutes",
                self.name,
                self.duration_minutes,
                SLOT_MINUTES
            );
        }
        if !(1..=5).contains(&self.priority) {
            bail!("task '{}': priority must be 1..=5, got {}", self.name, self.priority);
        }
        if !(1..=5).contains(&self.difficulty) {
            bail!("task '{}': difficulty must be 1..=5, got {}", self.name, self.difficulty);
        }
        if self.start_date > self.due_date {
            bail!(
                "task '{}': start date {} is after due date {}",
                self.name,
                self.start_date,
                self.due_date
            );
        }
        Ok(())
    }
}
