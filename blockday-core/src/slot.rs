//! Slot grid primitives: the fixed 15-minute quantum and its addressing.

use chrono::{NaiveTime, Timelike};
use serde::Serialize;

/// Minutes per slot.
pub const SLOT_MINUTES: u32 = 15;
pub const HOURS_PER_DAY: usize = 24;
pub const BLOCKS_PER_HOUR: usize = 4;
pub const SLOTS_PER_DAY: usize = HOURS_PER_DAY * BLOCKS_PER_HOUR;

/// One addressable 15-minute cell of a day: (hour, block).
///
/// Fields are private so every `Slot` is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Slot {
    hour: u8,
    block: u8,
}

impl Slot {
    pub fn new(hour: u8, block: u8) -> Option<Self> {
        if (hour as usize) < HOURS_PER_DAY && (block as usize) < BLOCKS_PER_HOUR {
            Some(Self { hour, block })
        } else {
            None
        }
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn block(self) -> u8 {
        self.block
    }

    /// Flat index into the day, 0..96.
    pub fn index(self) -> usize {
        self.hour as usize * BLOCKS_PER_HOUR + self.block as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        if idx >= SLOTS_PER_DAY {
            return None;
        }
        Some(Self {
            hour: (idx / BLOCKS_PER_HOUR) as u8,
            block: (idx % BLOCKS_PER_HOUR) as u8,
        })
    }

    /// Wall-clock time at which this slot begins.
    pub fn start_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour as u32, self.block as u32 * SLOT_MINUTES, 0)
            .unwrap_or(NaiveTime::MIN)
    }

    /// The slot containing `t` (floors to the slot boundary).
    pub fn from_time(t: NaiveTime) -> Self {
        Self {
            hour: t.hour() as u8,
            block: (t.minute() / SLOT_MINUTES) as u8,
        }
    }
}

/// Number of slots needed to cover `minutes`, rounding up.
pub fn slots_for(minutes: u32) -> usize {
    minutes.div_ceil(SLOT_MINUTES) as usize
}

/// True when `t` sits exactly on a slot boundary.
pub fn on_slot_boundary(t: NaiveTime) -> bool {
    t.second() == 0 && t.nanosecond() == 0 && t.minute() % SLOT_MINUTES == 0
}
