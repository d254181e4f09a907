//! Events: placed occupancy on a concrete date, plus the fixed-event input record.

use anyhow::{Result, bail};
use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::slot::{SLOT_MINUTES, Slot, on_slot_boundary};

const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A chunk (or the whole) of a scheduled task.
    Task,
    /// A calendar entry with a fixed date and time.
    Fixed,
    /// Sleep blocking derived from the energy profile.
    Sleep,
}

/// A placed, contiguous run of slots on one date.
///
/// `end_time` wraps to 00:00 for runs that finish at midnight; `minutes` is the
/// authoritative length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub kind: EventKind,
    pub priority: u8,
    pub difficulty: u8,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub minutes: u32,
}

impl Event {
    pub fn start_slot(&self) -> Slot {
        Slot::from_time(self.start_time)
    }

    pub fn with_meta(mut self, kind: EventKind, priority: u8, difficulty: u8) -> Self {
        self.kind = kind;
        self.priority = priority;
        self.difficulty = difficulty;
        self
    }
}

/// Fixed calendar entry as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedEvent {
    pub name: String,
    #[serde(default)]
    pub priority: u8,
    #[serde(default)]
    pub difficulty: u8,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    /// 00:00 means midnight at the end of `date`.
    pub end_time: NaiveTime,
}

impl FixedEvent {
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            difficulty: 0,
            date,
            start_time,
            end_time,
        }
    }

    pub fn minutes(&self) -> u32 {
        let start = self.start_time.num_seconds_from_midnight() / 60;
        let end = match self.end_time.num_seconds_from_midnight() / 60 {
            0 => MINUTES_PER_DAY,
            m => m,
        };
        end.saturating_sub(start)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("event name must not be empty");
        }
        if !on_slot_boundary(self.start_time) || !on_slot_boundary(self.end_time) {
            bail!(
                "event '{}': times must fall on {}-minute boundaries ({} - {})",
                self.name,
                SLOT_MINUTES,
                self.start_time,
                self.end_time
            );
        }
        if self.minutes() == 0 {
            bail!(
                "event '{}': end {} is not after start {}",
                self.name,
                self.end_time,
                self.start_time
            );
        }
        Ok(())
    }
}
