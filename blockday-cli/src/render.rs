use blockday_core::time::format_clock;
use blockday_core::{EnergyProfile, Event, Schedule, ScheduleReport, TaskOutcome};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PlanOutput<'a> {
    pub report: &'a ScheduleReport,
    pub events: &'a [Event],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<&'a blockday_core::Days>,
}

pub fn event_line(e: &Event) -> String {
    format!(
        "{} {}-{} [{:?}] {} (p={} d={}, {} min)",
        e.date,
        format_clock(e.start_time),
        format_clock(e.end_time),
        e.kind,
        e.name,
        e.priority,
        e.difficulty,
        e.minutes
    )
}

pub fn render_text(schedule: &Schedule, report: &ScheduleReport, grid: bool) -> String {
    let mut out = String::new();

    if grid {
        out.push_str("# Calendar\n\n");
        out.push_str(&schedule.render_grid());
        out.push('\n');
    }

    let mut events: Vec<&Event> = schedule.events.iter().collect();
    events.sort_by_key(|e| (e.date, e.start_time));

    out.push_str("# Events\n\n");
    for e in events {
        out.push_str(&format!("- {}\n", event_line(e)));
    }

    out.push_str("\n# Tasks\n\n");
    if report.resorted {
        out.push_str("(first pass incomplete; re-sorted by composite score)\n");
    }
    for r in &report.outcomes {
        match &r.outcome {
            TaskOutcome::Placed { events } => {
                out.push_str(&format!("- {}: placed in {} chunk(s)\n", r.name, events.len()));
            }
            TaskOutcome::Unplaced { remaining_minutes } => {
                out.push_str(&format!(
                    "- {}: cannot add task ({} min unplaced)\n",
                    r.name, remaining_minutes
                ));
            }
        }
    }
    out
}

pub fn render_profile(profile: &EnergyProfile) -> String {
    let mut out = String::new();
    for (hour, level) in profile.hourly().iter().enumerate() {
        let bar = "#".repeat((*level).max(0) as usize);
        out.push_str(&format!("{hour:02}:00 {level:>2} {bar}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockday_core::{EnergyLevels, EngineConfig, SchedulingEngine, Task};
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn text_lists_failures_explicitly() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let profile = EnergyProfile::build(
            &EnergyLevels::Coarse([3; 6]),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
        );
        let mut engine =
            SchedulingEngine::new(date, date, &profile, EngineConfig::default()).unwrap();
        engine.add_task(Task::new("nap", 30, date, date)).unwrap();
        engine.add_task(Task::new("marathon", 1200, date, date)).unwrap();
        let report = engine.run();
        let schedule = engine.into_schedule();

        let text = render_text(&schedule, &report, false);
        assert!(text.contains("- nap: placed in 1 chunk(s)"));
        assert!(text.contains("- marathon: cannot add task (1200 min unplaced)"));
        assert!(text.contains("08:00-08:30 [Task] nap"));
        assert!(!text.contains("# Calendar"));
    }

    #[test]
    fn profile_bars_skip_sleep_hours() {
        let profile = EnergyProfile::build(
            &EnergyLevels::Coarse([2; 6]),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(1, 0, 0).unwrap(),
        );
        let text = render_profile(&profile);
        assert!(text.starts_with("00:00  0 \n"));
        assert!(text.contains("05:00  2 ##\n"));
    }
}
