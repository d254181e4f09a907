//! DayCalendar: one day's fixed 24x4 slot grid.
//!
//! Each cell is either empty or carries the name of the item occupying it.
//! The grid never changes shape; it is only relabeled by `place` and `release`.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::event::{Event, EventKind};
use crate::slot::{BLOCKS_PER_HOUR, HOURS_PER_DAY, SLOT_MINUTES, SLOTS_PER_DAY, Slot, slots_for};

/// Free block indices, one set per hour.
pub type FreeSlots = [BTreeSet<u8>; HOURS_PER_DAY];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCalendar {
    date: NaiveDate,
    grid: Vec<Option<String>>,
}

impl DayCalendar {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            grid: vec![None; SLOTS_PER_DAY],
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn label(&self, slot: Slot) -> Option<&str> {
        self.grid[slot.index()].as_deref()
    }

    pub fn is_free(&self, slot: Slot) -> bool {
        self.grid[slot.index()].is_none()
    }

    /// Free blocks per hour, computed from the grid on every call.
    pub fn free_slots(&self) -> FreeSlots {
        std::array::from_fn(|hour| {
            (0..BLOCKS_PER_HOUR)
                .filter(|block| self.grid[hour * BLOCKS_PER_HOUR + block].is_none())
                .map(|block| block as u8)
                .collect()
        })
    }

    pub fn free_minutes(&self) -> u32 {
        self.grid.iter().filter(|c| c.is_none()).count() as u32 * SLOT_MINUTES
    }

    /// First slot starting a free run of at least `minutes`, scanning chronologically.
    ///
    /// The running counter resets whenever an occupied slot is hit; the candidate
    /// start is the first free slot of the current run. A request for exactly one
    /// slot length therefore returns the first free slot of the day.
    pub fn find_run(&self, minutes: u32) -> Option<Slot> {
        if minutes == 0 {
            return None;
        }

        let mut run = 0u32;
        let mut candidate = 0usize;
        for (idx, cell) in self.grid.iter().enumerate() {
            if cell.is_some() {
                run = 0;
                continue;
            }
            if run == 0 {
                candidate = idx;
            }
            run += SLOT_MINUTES;
            if run >= minutes {
                return Slot::from_index(candidate);
            }
        }
        None
    }

    /// Label `ceil(minutes / 15)` consecutive slots from `start` with `name`.
    ///
    /// Availability is the caller's responsibility: occupied cells get
    /// overwritten. Cells past the end of the day are never written, and the
    /// returned event covers only the cells actually labeled.
    pub fn place(&mut self, name: &str, start: Slot, minutes: u32) -> Event {
        let first = start.index();
        let last = (first + slots_for(minutes)).min(SLOTS_PER_DAY);
        for cell in &mut self.grid[first..last] {
            *cell = Some(name.to_string());
        }

        let covered = (last - first) as u32 * SLOT_MINUTES;
        let start_time = start.start_time();
        let (end_time, _) = start_time.overflowing_add_signed(Duration::minutes(covered.into()));

        Event {
            name: name.to_string(),
            kind: EventKind::Task,
            priority: 0,
            difficulty: 0,
            date: self.date,
            start_time,
            end_time,
            minutes: covered,
        }
    }

    /// Clear cells in the run that are still labeled `name`. Used to undo a placement.
    pub fn release(&mut self, name: &str, start: Slot, minutes: u32) {
        let first = start.index();
        let last = (first + slots_for(minutes)).min(SLOTS_PER_DAY);
        for cell in &mut self.grid[first..last] {
            if cell.as_deref() == Some(name) {
                *cell = None;
            }
        }
    }

    /// Row-major labels, `None` for free cells.
    pub fn cells(&self) -> impl Iterator<Item = (Slot, Option<&str>)> {
        self.grid
            .iter()
            .enumerate()
            .filter_map(|(idx, c)| Slot::from_index(idx).map(|s| (s, c.as_deref())))
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DayCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.date.format("%Y-%m-%d (%a)"))?;
        for hour in 0..HOURS_PER_DAY {
            write!(f, "{hour:02}:00 |")?;
            for block in 0..BLOCKS_PER_HOUR {
                let label = self.grid[hour * BLOCKS_PER_HOUR + block].as_deref().unwrap_or(".");
                write!(f, " {label:<12}|")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
