//! Plan file: date range, preferences, fixed events and tasks, read from TOML.

use anyhow::{Context, Result};
use blockday_core::time::parse_clock;
use blockday_core::{
    EnergyLevels, EnergyProfile, EngineConfig, FixedEvent, SchedulingEngine, Task,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct PlanFile {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub preferences: Preferences,
    #[serde(default)]
    pub events: Vec<EventRecord>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Preferences {
    #[serde(deserialize_with = "clock")]
    pub sleep_start: NaiveTime,
    #[serde(deserialize_with = "clock")]
    pub sleep_end: NaiveTime,
    pub energy_levels: EnergyLevels,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub name: String,
    #[serde(default)]
    pub priority: u8,
    #[serde(default)]
    pub difficulty: u8,
    pub date: NaiveDate,
    #[serde(deserialize_with = "clock")]
    pub start_time: NaiveTime,
    #[serde(deserialize_with = "clock")]
    pub end_time: NaiveTime,
}

impl From<EventRecord> for FixedEvent {
    fn from(r: EventRecord) -> Self {
        FixedEvent {
            name: r.name,
            priority: r.priority,
            difficulty: r.difficulty,
            date: r.date,
            start_time: r.start_time,
            end_time: r.end_time,
        }
    }
}

fn clock<'de, D>(deserializer: D) -> std::result::Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_clock(&s).map_err(serde::de::Error::custom)
}

impl PlanFile {
    pub fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::parse(&s).with_context(|| format!("parse {}", path.display()))
    }

    pub fn parse(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn profile(&self) -> EnergyProfile {
        EnergyProfile::build(
            &self.preferences.energy_levels,
            self.preferences.sleep_start,
            self.preferences.sleep_end,
        )
    }

    /// Blank calendar with fixed events placed and tasks queued (not yet scheduled).
    pub fn build_engine<'a>(
        &self,
        profile: &'a EnergyProfile,
        config: EngineConfig,
    ) -> Result<SchedulingEngine<'a>> {
        let mut engine = SchedulingEngine::new(self.start_date, self.end_date, profile, config)?;
        for record in &self.events {
            engine
                .add_event(&FixedEvent::from(record.clone()))
                .with_context(|| format!("adding event '{}'", record.name))?;
        }
        engine.add_tasks(self.tasks.iter().cloned())?;
        Ok(engine)
    }
}
