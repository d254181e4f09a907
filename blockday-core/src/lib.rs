//! blockday-core: slot-allocation engine for tasks, fixed events and sleep.
//!
//! Days are fixed 96-slot grids (24 hours x 4 blocks of 15 minutes). Tasks are
//! placed first-fit inside their date window; chunkable tasks may be split
//! across runs and days. Hours with zero energy are blocked as sleep.

pub mod day;
pub mod energy;
pub mod engine;
pub mod event;
pub mod schedule;
pub mod slot;
pub mod task;
pub mod time;

pub use day::{DayCalendar, FreeSlots};
pub use energy::{EnergyLevels, EnergyProfile, SleepWindow};
pub use engine::{
    EngineConfig, ScheduleReport, SchedulingEngine, SleepOrder, TaskOutcome, TaskReport,
};
pub use event::{Event, EventKind, FixedEvent};
pub use schedule::{Days, Schedule, generate};
pub use slot::{SLOT_MINUTES, SLOTS_PER_DAY, Slot, slots_for};
pub use task::Task;
