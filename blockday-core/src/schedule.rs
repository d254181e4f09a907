//! Blank-schedule generation and the finished `Schedule` value.

use std::collections::{BTreeMap, HashSet};

use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::day::DayCalendar;
use crate::event::Event;
use crate::slot::{SLOTS_PER_DAY, slots_for};
use crate::task::Task;

pub type Days = BTreeMap<NaiveDate, DayCalendar>;

/// One empty `DayCalendar` per date in `start..=end`, in date order.
pub fn generate(start: NaiveDate, end: NaiveDate) -> Days {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| (d, DayCalendar::new(d)))
        .collect()
}

/// Date-ordered calendars plus the tasks and events that produced them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    pub days: Days,
    pub tasks: Vec<Task>,
    pub events: Vec<Event>,
}

impl Schedule {
    pub fn events_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.iter().filter(move |e| e.name == name)
    }

    /// Grid dump of every day, in date order.
    pub fn render_grid(&self) -> String {
        self.days
            .values()
            .map(DayCalendar::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check that every event's slots carry its name and no slot is claimed twice.
    pub fn verify_single_ownership(&self) -> Result<()> {
        let mut claimed: HashSet<(NaiveDate, usize)> = HashSet::new();

        for ev in &self.events {
            let Some(day) = self.days.get(&ev.date) else {
                bail!("event '{}' is on {} which is outside the schedule", ev.name, ev.date);
            };
            let first = ev.start_slot().index();
            let last = first + slots_for(ev.minutes);
            if last > SLOTS_PER_DAY {
                bail!("event '{}' on {} runs past the end of the day", ev.name, ev.date);
            }

            for (slot, label) in day.cells().skip(first).take(last - first) {
                if label != Some(ev.name.as_str()) {
                    bail!(
                        "event '{}' on {} expects slot {:02}:{} but found {:?}",
                        ev.name,
                        ev.date,
                        slot.hour(),
                        slot.block(),
                        label
                    );
                }
                if !claimed.insert((ev.date, slot.index())) {
                    bail!(
                        "slot {:02}:{} on {} is claimed by more than one event",
                        slot.hour(),
                        slot.block(),
                        ev.date
                    );
                }
            }
        }
        Ok(())
    }
}
