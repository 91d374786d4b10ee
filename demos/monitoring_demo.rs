//! Monitoring session demonstration
//!
//! Walks an observer through a short session near Cupertino using the
//! in-memory collaborators. Set `RUST_LOG=hunt_proximity=debug` to see the
//! session's internal logging.

use hunt_proximity::api::mock::{
    RecordingDispatcher, RecordingProgressTracker, ScriptedLocationProvider, StaticRosterRepository,
};
use hunt_proximity::api::{AlertFormatter, TextAlertFormatter};
use hunt_proximity::{
    ActivityArea, Coordinate, DistanceUnit, MonitoringConfig, MonitoringService, Observer, PersonMode, Position,
    RadiusAlertEvaluator, Roster, TrackedPerson,
};
use tracing_subscriber::EnvFilter;

const START: i64 = 1663142183;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Hunt Proximity - Monitoring Demo ===\n");

    let roster = Roster::new(vec![
        TrackedPerson::new("yoan83", Position::new(37.33070248, -122.02957434, START), PersonMode::Hunter),
        TrackedPerson::new("yoan8306", Position::new(37.33233141, -122.0312186, START), PersonMode::Hunter),
        TrackedPerson::new("yoyo", Position::new(37.33233141, -122.0312186, START), PersonMode::Walker),
    ]);

    let fixes = vec![
        Position::new(37.33123666, -122.03076342, START),
        Position::new(37.33115792, -122.03076154, START + 30),
        Position::new(37.33233141, -122.0312186, START + 600),
    ];

    demo_session(roster.clone(), fixes)?;
    demo_activity_area(&roster)?;

    Ok(())
}

fn demo_session(roster: Roster, fixes: Vec<Position>) -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Session ---");

    let mut service = MonitoringService::new(
        MonitoringConfig::default(),
        Observer::new("yoan8306", PersonMode::Hunter),
        ScriptedLocationProvider::with_fixes(fixes),
        StaticRosterRepository::new(roster),
        RecordingDispatcher::new(),
        RecordingProgressTracker::new(),
    )?;

    let recorded = service.poll_location()?;
    println!("Recorded {} fixes, walked {}", recorded, service.displayed_distance());

    service.refresh_roster()?;
    let now = START + 600;
    let alerts = service.check_radius_at(now)?;
    println!("{} people within {} m", alerts, service.config().alert_radius_m);

    let evaluator = RadiusAlertEvaluator::from_config(service.config())?;
    let matches = evaluator.evaluate(service.observer(), service.roster(), now)?;
    let formatter = TextAlertFormatter { unit: DistanceUnit::Meters };
    for line in formatter.format_batch(&matches) {
        println!("  {}", line);
    }

    let total = service.end_session()?;
    println!("Session closed at {:.1} m\n", total.value());
    Ok(())
}

fn demo_activity_area(roster: &Roster) -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Activity area ---");

    let area = ActivityArea::new(
        "Apple Park stand",
        START,
        vec![
            Coordinate::new(37.3310, -122.0330),
            Coordinate::new(37.3340, -122.0330),
            Coordinate::new(37.3340, -122.0290),
            Coordinate::new(37.3310, -122.0290),
        ],
    )?;

    println!("'{}' spans about {:.0} m", area.name, area.bounding_radius().value());
    for person in area.occupants(roster) {
        println!("  inside: {} ({})", person.display_name, person.mode);
    }
    Ok(())
}
