//! Scheduling engine: first-fit placement over a bounded date range.
//!
//! Pipeline:
//! 1) blank calendar, one `DayCalendar` per date
//! 2) fixed events placed at their given times
//! 3) sleep blocking from the energy profile (before or after tasks, see `SleepOrder`)
//! 4) tasks placed first-fit in list order, chunkable tasks split into runs of
//!    at most `chunk_minutes`, possibly across days
//! 5) if any task fails, task placements are rolled back, the task list is
//!    stable-sorted by ascending composite score and replayed exactly once

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::energy::EnergyProfile;
use crate::event::{Event, EventKind, FixedEvent};
use crate::schedule::{Days, Schedule, generate};
use crate::slot::{BLOCKS_PER_HOUR, SLOT_MINUTES, Slot, slots_for};
use crate::task::Task;

/// Where the sleep-blocking pass runs relative to task placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepOrder {
    #[default]
    BeforeTasks,
    AfterTasks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest run a chunkable task is split into.
    pub chunk_minutes: u32,
    pub sleep_order: SleepOrder,
    /// Label written into slots blocked for sleep.
    pub sleep_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_minutes: 60,
            sleep_order: SleepOrder::BeforeTasks,
            sleep_label: "sleep".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_minutes == 0 || self.chunk_minutes % SLOT_MINUTES != 0 {
            bail!(
                "chunk_minutes must be a positive multiple of {SLOT_MINUTES}, got {}",
                self.chunk_minutes
            );
        }
        if self.sleep_label.trim().is_empty() {
            bail!("sleep_label must not be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    Placed { events: Vec<Event> },
    Unplaced { remaining_minutes: u32 },
}

impl TaskOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, Self::Placed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReport {
    pub name: String,
    pub outcome: TaskOutcome,
}

/// Result of a full task placement run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleReport {
    /// One entry per task, in the order of the final pass.
    pub outcomes: Vec<TaskReport>,
    /// True when the first pass failed and the re-sorted pass ran.
    pub resorted: bool,
}

impl ScheduleReport {
    pub fn all_placed(&self) -> bool {
        self.outcomes.iter().all(|r| r.outcome.is_placed())
    }

    pub fn failed(&self) -> impl Iterator<Item = &TaskReport> {
        self.outcomes.iter().filter(|r| !r.outcome.is_placed())
    }

    pub fn outcome(&self, name: &str) -> Option<&TaskOutcome> {
        self.outcomes.iter().find(|r| r.name == name).map(|r| &r.outcome)
    }
}

/// Owns the date range and everything placed into it.
#[derive(Debug, Clone)]
pub struct SchedulingEngine<'a> {
    profile: &'a EnergyProfile,
    config: EngineConfig,
    days: Days,
    tasks: Vec<Task>,
    events: Vec<Event>,
}

impl<'a> SchedulingEngine<'a> {
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        profile: &'a EnergyProfile,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate().context("invalid engine config")?;
        if start > end {
            bail!("schedule start {start} is after end {end}");
        }

        Ok(Self {
            profile,
            config,
            days: generate(start, end),
            tasks: Vec::new(),
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn profile(&self) -> &EnergyProfile {
        self.profile
    }

    pub fn days(&self) -> &Days {
        &self.days
    }

    pub fn day(&self, date: NaiveDate) -> Option<&crate::day::DayCalendar> {
        self.days.get(&date)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn add_task(&mut self, task: Task) -> Result<()> {
        task.validate()?;
        self.tasks.push(task);
        Ok(())
    }

    pub fn add_tasks(&mut self, tasks: impl IntoIterator<Item = Task>) -> Result<()> {
        for t in tasks {
            self.add_task(t)?;
        }
        Ok(())
    }

    /// Place a fixed calendar entry. Its slots must lie in the range and be free.
    pub fn add_event(&mut self, fixed: &FixedEvent) -> Result<Event> {
        fixed.validate()?;
        let Some(day) = self.days.get_mut(&fixed.date) else {
            bail!(
                "event '{}' on {} is outside the scheduled range",
                fixed.name,
                fixed.date
            );
        };

        let start = Slot::from_time(fixed.start_time);
        let minutes = fixed.minutes();
        let first = start.index();
        if let Some((slot, Some(owner))) = day
            .cells()
            .skip(first)
            .take(slots_for(minutes))
            .find(|(_, label)| label.is_some())
        {
            bail!(
                "event '{}' overlaps '{}' at {} on {}",
                fixed.name,
                owner,
                slot.start_time(),
                fixed.date
            );
        }

        let ev = day
            .place(&fixed.name, start, minutes)
            .with_meta(EventKind::Fixed, fixed.priority, fixed.difficulty);
        debug!(event = %ev.name, date = %ev.date, start = %ev.start_time, minutes, "placed fixed event");
        self.events.push(ev.clone());
        Ok(ev)
    }

    /// Block every zero-energy hour as sleep on every day.
    ///
    /// Only free cells are labeled, so running after task placement never
    /// double-books a slot. Returns the number of sleep events produced.
    pub fn apply_sleep(&mut self) -> usize {
        let hours: Vec<usize> = self.profile.sleep_hours().collect();
        let label = self.config.sleep_label.clone();
        let mut produced = 0;

        for day in self.days.values_mut() {
            for &hour in &hours {
                let free_hours = day.free_slots();
                let free = &free_hours[hour];
                let mut block = 0;
                while block < BLOCKS_PER_HOUR {
                    if !free.contains(&(block as u8)) {
                        block += 1;
                        continue;
                    }
                    let run_start = block;
                    while block < BLOCKS_PER_HOUR && free.contains(&(block as u8)) {
                        block += 1;
                    }
                    let Some(start) = Slot::new(hour as u8, run_start as u8) else {
                        continue;
                    };
                    let minutes = (block - run_start) as u32 * SLOT_MINUTES;
                    let ev = day.place(&label, start, minutes).with_meta(EventKind::Sleep, 0, 0);
                    self.events.push(ev);
                    produced += 1;
                }
            }
        }

        info!(hours = hours.len(), events = produced, "applied sleep blocking");
        produced
    }

    /// One first-fit attempt for `task`, without the re-sort fallback.
    ///
    /// A task that cannot be fully placed has its partial chunks released.
    /// Tasks failing `Task::validate` are never placed.
    pub fn place_task(&mut self, task: &Task) -> TaskOutcome {
        if let Err(e) = task.validate() {
            warn!(task = %task.name, error = %e, "rejecting invalid task");
            return TaskOutcome::Unplaced {
                remaining_minutes: task.duration_minutes,
            };
        }

        let block_size = if task.chunkable {
            task.duration_minutes.min(self.config.chunk_minutes)
        } else {
            task.duration_minutes
        };

        let mut remaining = task.duration_minutes;

        let mut placed: Vec<Event> = Vec::new();
        for (date, day) in self.days.range_mut(task.start_date..=task.due_date) {
            while remaining > 0 {
                let want = remaining.min(block_size);
                let Some(start) = day.find_run(want) else {
                    break;
                };
                let ev = day
                    .place(&task.name, start, want)
                    .with_meta(EventKind::Task, task.priority, task.difficulty);
                debug!(task = %task.name, date = %date, start = %ev.start_time, minutes = want, "placed chunk");
                remaining -= want;
                placed.push(ev);
            }
            if remaining == 0 {
                break;
            }
        }

        if remaining > 0 {
            for ev in &placed {
                if let Some(day) = self.days.get_mut(&ev.date) {
                    day.release(&ev.name, ev.start_slot(), ev.minutes);
                }
            }
            return TaskOutcome::Unplaced {
                remaining_minutes: remaining,
            };
        }

        self.events.extend(placed.iter().cloned());
        TaskOutcome::Placed { events: placed }
    }

    /// Place every task, falling back to a single re-sorted replay on failure.
    pub fn schedule_tasks(&mut self) -> ScheduleReport {
        let baseline_days = self.days.clone();
        let baseline_events = self.events.len();

        info!(tasks = self.tasks.len(), "placing tasks");
        let first = self.run_pass();
        if first.iter().all(|r| r.outcome.is_placed()) {
            return ScheduleReport {
                outcomes: first,
                resorted: false,
            };
        }

        let failed = first.iter().filter(|r| !r.outcome.is_placed()).count();
        info!(failed, "first pass incomplete; re-sorting by composite score and retrying");

        self.days = baseline_days;
        self.events.truncate(baseline_events);
        self.tasks
            .sort_by(|a, b| a.composite_score().total_cmp(&b.composite_score()));

        let second = self.run_pass();
        for r in second.iter().filter(|r| !r.outcome.is_placed()) {
            if let TaskOutcome::Unplaced { remaining_minutes } = r.outcome {
                warn!(task = %r.name, remaining_minutes, "cannot add task");
            }
        }

        ScheduleReport {
            outcomes: second,
            resorted: true,
        }
    }

    /// Sleep blocking and task placement in the configured order.
    pub fn run(&mut self) -> ScheduleReport {
        match self.config.sleep_order {
            SleepOrder::BeforeTasks => {
                self.apply_sleep();
                self.schedule_tasks()
            }
            SleepOrder::AfterTasks => {
                let report = self.schedule_tasks();
                self.apply_sleep();
                report
            }
        }
    }

    pub fn into_schedule(self) -> Schedule {
        Schedule {
            days: self.days,
            tasks: self.tasks,
            events: self.events,
        }
    }

    fn run_pass(&mut self) -> Vec<TaskReport> {
        let tasks = self.tasks.clone();
        tasks
            .iter()
            .map(|t| TaskReport {
                name: t.name.clone(),
                outcome: self.place_task(t),
            })
            .collect()
    }
}
