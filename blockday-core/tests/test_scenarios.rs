use blockday_core::{
    EnergyLevels, EnergyProfile, EngineConfig, EventKind, FixedEvent, SchedulingEngine, Slot,
    Task, TaskOutcome,
};
use chrono::{NaiveDate, NaiveTime};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, day).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn profile() -> EnergyProfile {
    EnergyProfile::build(&EnergyLevels::Coarse([3; 6]), t(0, 0), t(7, 30))
}

/// Leave only 00:00..free_until open on `date`.
fn wall_off(engine: &mut SchedulingEngine<'_>, date: NaiveDate, free_until: NaiveTime) {
    engine
        .add_event(&FixedEvent::new("busy", date, free_until, t(0, 0)))
        .unwrap();
}

fn placed_events(outcome: Option<&TaskOutcome>) -> Vec<blockday_core::Event> {
    match outcome {
        Some(TaskOutcome::Placed { events }) => events.clone(),
        other => panic!("expected placement, got {other:?}"),
    }
}

#[test]
fn scenario_a_sleep_until_half_seven() {
    let p = profile();
    let hourly = p.hourly();
    assert!(hourly[..8].iter().all(|v| *v == 0));
    assert!(hourly[8..].iter().all(|v| *v == 3));
}

#[test]
fn scenario_b_single_run_on_empty_day() {
    let p = profile();
    let mut engine = SchedulingEngine::new(d(1), d(1), &p, EngineConfig::default()).unwrap();
    engine.add_task(Task::new("report", 75, d(1), d(1))).unwrap();

    let report = engine.schedule_tasks();
    assert!(!report.resorted);
    let events = placed_events(report.outcome("report"));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].start_time, t(0, 0));
    assert_eq!(events[0].end_time, t(1, 15));
    assert_eq!(events[0].minutes, 75);
}

#[test]
fn scenario_c_chunks_split_across_days() {
    let p = profile();
    let cfg = EngineConfig {
        chunk_minutes: 90,
        ..EngineConfig::default()
    };
    let mut engine = SchedulingEngine::new(d(1), d(3), &p, cfg).unwrap();
    for day in 1..=3 {
        wall_off(&mut engine, d(day), t(1, 30));
    }
    engine
        .add_task(Task::new("thesis", 180, d(1), d(3)).chunkable())
        .unwrap();

    let report = engine.schedule_tasks();
    let events = placed_events(report.outcome("thesis"));
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.minutes == 90));
    assert_eq!(events[0].date, d(1));
    assert_eq!(events[1].date, d(2));

    // Placement stopped once the duration was covered.
    assert_eq!(engine.day(d(3)).unwrap().free_minutes(), 90);
    engine.into_schedule().verify_single_ownership().unwrap();
}

#[test]
fn scenario_c_with_default_chunk_uses_all_three_days() {
    let p = profile();
    let mut engine = SchedulingEngine::new(d(1), d(3), &p, EngineConfig::default()).unwrap();
    for day in 1..=3 {
        wall_off(&mut engine, d(day), t(1, 30));
    }
    engine
        .add_task(Task::new("thesis", 180, d(1), d(3)).chunkable())
        .unwrap();

    let report = engine.schedule_tasks();
    let events = placed_events(report.outcome("thesis"));
    let dates: Vec<NaiveDate> = events.iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![d(1), d(2), d(3)]);
    assert_eq!(events.iter().map(|e| e.minutes).sum::<u32>(), 180);
}

#[test]
fn scenario_d_lower_score_wins_after_resort() {
    let p = profile();
    let mut engine = SchedulingEngine::new(d(1), d(1), &p, EngineConfig::default()).unwrap();
    wall_off(&mut engine, d(1), t(2, 0));

    engine
        .add_task(Task::new("heavy", 90, d(1), d(1)).with_priority(5).with_difficulty(5))
        .unwrap();
    engine
        .add_task(Task::new("light", 60, d(1), d(1)).with_priority(1).with_difficulty(1))
        .unwrap();

    let report = engine.schedule_tasks();
    assert!(report.resorted);
    assert_eq!(report.outcomes[0].name, "light");

    let light = placed_events(report.outcome("light"));
    assert_eq!(light[0].start_time, t(0, 0));
    assert_eq!(
        report.outcome("heavy"),
        Some(&TaskOutcome::Unplaced {
            remaining_minutes: 90
        })
    );
    let failed: Vec<&str> = report.failed().map(|r| r.name.as_str()).collect();
    assert_eq!(failed, vec!["heavy"]);

    // The fixed entry survives the rollback and the final grid is consistent.
    let schedule = engine.into_schedule();
    assert!(schedule.events.iter().any(|e| e.kind == EventKind::Fixed && e.name == "busy"));
    assert_eq!(schedule.events_for("heavy").count(), 0);
    assert_eq!(
        schedule.days[&d(1)].label(Slot::new(0, 0).unwrap()),
        Some("light")
    );
    schedule.verify_single_ownership().unwrap();
}

#[test]
fn full_run_with_sleep_first() {
    let p = profile();
    let mut engine = SchedulingEngine::new(d(1), d(2), &p, EngineConfig::default()).unwrap();
    engine
        .add_event(&FixedEvent::new("lecture", d(1), t(9, 0), t(10, 30)))
        .unwrap();
    engine
        .add_tasks([
            Task::new("reading", 120, d(1), d(2)).chunkable(),
            Task::new("lab", 60, d(1), d(1)).with_priority(4),
        ])
        .unwrap();

    let report = engine.run();
    assert!(report.all_placed());

    let schedule = engine.into_schedule();
    let reading: Vec<_> = schedule.events_for("reading").collect();
    assert_eq!(reading[0].start_time, t(8, 0));
    assert_eq!(reading[1].start_time, t(10, 30));
    let lab: Vec<_> = schedule.events_for("lab").collect();
    assert_eq!(lab[0].start_time, t(11, 30));
    assert_eq!(schedule.events.iter().filter(|e| e.kind == EventKind::Sleep).count(), 16);
    schedule.verify_single_ownership().unwrap();
}
