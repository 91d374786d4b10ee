//! Monitoring session wiring the algorithms to their collaborators
//!
//! A `MonitoringService` owns one observer's session: it pulls fixes from the
//! location provider, keeps the roster snapshot fresh, raises alerts through
//! the dispatcher and forwards walked distance to the progress tracker.

use crate::algorithms::radius::current_time_s;
use crate::algorithms::{DistanceAccumulator, EntryClassification, RadiusAlertEvaluator};
use crate::api::collaborators::{AlertDispatcher, LocationProvider, ProgressTracker, TrackedPersonRepository};
use crate::api::formatting::format_distance;
use crate::api::types::MonitoringResult;
use crate::core::{Meters, Observer, Position, Roster};
use crate::processing::{FixDecision, FixFilter};
use crate::utils::config::{validate_config, ConfigError, MonitoringConfig};
use crate::validation::CoordinateValidator;
use tracing::{debug, info, warn};

pub struct MonitoringService<L, R, D, P> {
    config: MonitoringConfig,
    evaluator: RadiusAlertEvaluator,
    accumulator: DistanceAccumulator,
    filter: Option<FixFilter>,
    observer: Observer,
    roster: Roster,
    location: L,
    repository: R,
    dispatcher: D,
    progress: P,
}

impl<L, R, D, P> MonitoringService<L, R, D, P>
where
    L: LocationProvider,
    R: TrackedPersonRepository,
    D: AlertDispatcher,
    P: ProgressTracker,
{
    pub fn new(
        config: MonitoringConfig,
        observer: Observer,
        location: L,
        repository: R,
        dispatcher: D,
        progress: P,
    ) -> Result<Self, ConfigError> {
        validate_config(&config)?;
        let evaluator = RadiusAlertEvaluator::from_config(&config)?;
        let filter = config.fix_filter.map(FixFilter::new);

        info!(
            observer = %observer.display_name,
            alert_radius_m = config.alert_radius_m,
            filtered = filter.is_some(),
            "monitoring session created"
        );

        Ok(Self {
            config,
            evaluator,
            accumulator: DistanceAccumulator::new(),
            filter,
            observer,
            roster: Roster::default(),
            location,
            repository,
            dispatcher,
            progress,
        })
    }

    /// Drain every pending fix from the location provider.
    /// Returns the number of fixes recorded by the accumulator.
    pub fn poll_location(&mut self) -> MonitoringResult<usize> {
        let mut recorded = 0;
        while let Some(fix) = self.location.next_fix()? {
            if self.ingest_fix(fix) {
                recorded += 1;
            }
        }
        Ok(recorded)
    }

    /// Feed fixes that were buffered elsewhere, e.g. while the app was suspended
    pub fn ingest_fixes<I>(&mut self, fixes: I) -> usize
    where
        I: IntoIterator<Item = Position>,
    {
        fixes.into_iter().filter(|fix| self.ingest_fix(*fix)).count()
    }

    fn ingest_fix(&mut self, fix: Position) -> bool {
        if let Err(error) = CoordinateValidator::validate_fix(&fix) {
            warn!(%error, "dropping location fix");
            return false;
        }

        // Every valid fix moves the observer, even when it is too noisy to count as travel
        self.observer.position = Some(fix);

        if let Some(filter) = self.filter.as_mut() {
            let decision: FixDecision = filter.assess(&fix);
            if !decision.is_accepted() {
                debug!(?decision, "fix not accumulated");
                return false;
            }
        }

        self.accumulator.record_fix(fix);
        true
    }

    /// Replace the roster with a fresh snapshot from the repository
    pub fn refresh_roster(&mut self) -> MonitoringResult<usize> {
        let roster = self.repository.fetch_roster()?;
        debug!(entries = roster.len(), "roster refreshed");
        self.roster = roster;
        Ok(self.roster.len())
    }

    /// Publish the observer's current position to the repository
    pub fn publish_position(&mut self) -> MonitoringResult<()> {
        let position = *CoordinateValidator::anchor_position(&self.observer)?;
        self.repository.publish_position(&self.observer, &position)?;
        Ok(())
    }

    /// Evaluate the roster at `now_s` and dispatch alerts if anyone is in range.
    /// Returns the number of matches.
    pub fn check_radius_at(&mut self, now_s: i64) -> MonitoringResult<usize> {
        let matches = self.evaluator.evaluate(&self.observer, &self.roster, now_s)?;
        if !matches.is_empty() {
            info!(matches = matches.len(), "people within alert radius");
            self.dispatcher.dispatch(&matches)?;
        }
        Ok(matches.len())
    }

    pub fn check_radius(&mut self) -> MonitoringResult<usize> {
        self.check_radius_at(current_time_s())
    }

    /// Per-entry breakdown of the current roster, without dispatching
    pub fn classify_roster(&self, now_s: i64) -> MonitoringResult<Vec<EntryClassification<'_>>> {
        Ok(self.evaluator.classify(&self.observer, &self.roster, now_s)?)
    }

    /// Forward the session distance to the progress tracker
    pub fn report_progress(&mut self) -> MonitoringResult<Meters> {
        let distance = self.accumulator.current_distance();
        self.progress.record_distance(distance)?;
        Ok(distance)
    }

    /// Report the final distance and start over.
    /// The session is kept intact when the report fails so it can be retried.
    pub fn end_session(&mut self) -> MonitoringResult<Meters> {
        let distance = self.report_progress()?;
        self.accumulator.reset();
        if let Some(filter) = self.filter.as_mut() {
            filter.reset();
        }
        info!(distance_m = distance.value(), "monitoring session ended");
        Ok(distance)
    }

    /// Session distance rendered in the configured display unit
    pub fn displayed_distance(&self) -> String {
        format_distance(self.accumulator.current_distance(), self.config.display_unit)
    }

    /// Apply a new configuration; the accumulated distance is preserved
    pub fn update_config(&mut self, config: MonitoringConfig) -> MonitoringResult<()> {
        validate_config(&config)?;
        self.evaluator = RadiusAlertEvaluator::from_config(&config)?;
        if config.fix_filter != self.config.fix_filter {
            self.filter = config.fix_filter.map(FixFilter::new);
        }
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &MonitoringConfig {
        &self.config
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn accumulator(&self) -> &DistanceAccumulator {
        &self.accumulator
    }

    pub fn filter(&self) -> Option<&FixFilter> {
        self.filter.as_ref()
    }

    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repository
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn progress(&self) -> &P {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut P {
        &mut self.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::great_circle::destination;
    use crate::algorithms::EntryVerdict;
    use crate::api::mock::{
        RecordingDispatcher, RecordingProgressTracker, ScriptedLocationProvider, StaticRosterRepository,
    };
    use crate::api::types::MonitoringError;
    use crate::core::{DistanceUnit, PersonMode, TrackedPerson};
    use crate::processing::FixFilterConfig;
    use crate::validation::{CollaboratorError, PositionIssue, TrackingError};

    const NOW: i64 = 1663142183;

    type TestService =
        MonitoringService<ScriptedLocationProvider, StaticRosterRepository, RecordingDispatcher, RecordingProgressTracker>;

    fn fixture_roster() -> Roster {
        Roster::new(vec![
            TrackedPerson::new("yoan83", Position::new(37.33070248, -122.02957434, NOW), PersonMode::Hunter),
            TrackedPerson::new("yoan8306", Position::new(37.33233141, -122.0312186, NOW), PersonMode::Hunter),
            TrackedPerson::new("yoyo", Position::new(37.33233141, -122.0312186, NOW), PersonMode::Hunter),
        ])
    }

    fn service(config: MonitoringConfig, name: &str, fixes: Vec<Position>) -> TestService {
        MonitoringService::new(
            config,
            Observer::new(name, PersonMode::Walker),
            ScriptedLocationProvider::with_fixes(fixes),
            StaticRosterRepository::new(fixture_roster()),
            RecordingDispatcher::new(),
            RecordingProgressTracker::new(),
        )
        .unwrap()
    }

    fn walk() -> Vec<Position> {
        let start = Position::new(37.33233141, -122.0312186, NOW);
        (0..4)
            .map(|step| {
                let spot = destination(&start.coordinate(), 90.0, Meters(100.0 * step as f64));
                Position::new(spot.latitude, spot.longitude, NOW + 60 * step)
            })
            .collect()
    }

    #[test]
    fn test_poll_and_alert() {
        let mut service = service(MonitoringConfig::default(), "yoan8306", vec![Position::new(37.33233141, -122.0312186, NOW)]);

        assert_eq!(service.poll_location().unwrap(), 1);
        assert_eq!(service.refresh_roster().unwrap(), 3);
        assert_eq!(service.check_radius_at(NOW).unwrap(), 2);

        let batch = service.dispatcher().last_batch().unwrap();
        let names: Vec<&str> = batch.iter().map(|a| a.display_name.as_str()).collect();
        assert_eq!(names, vec!["yoan83", "yoyo"]);
    }

    #[test]
    fn test_no_dispatch_without_matches() {
        let config = MonitoringConfig { alert_radius_m: 10.0, ..Default::default() };
        let mut service = service(config, "walker", vec![Position::new(37.0, -122.0, NOW)]);
        service.poll_location().unwrap();
        service.refresh_roster().unwrap();

        assert_eq!(service.check_radius_at(NOW).unwrap(), 0);
        assert!(service.dispatcher().batches().is_empty());
    }

    #[test]
    fn test_check_radius_without_fix_fails() {
        let mut service = service(MonitoringConfig::default(), "walker", Vec::new());
        service.refresh_roster().unwrap();

        assert_eq!(
            service.check_radius_at(NOW),
            Err(MonitoringError::Tracking(TrackingError::InvalidSelfPosition { issue: PositionIssue::Missing }))
        );
    }

    #[test]
    fn test_invalid_fix_skipped() {
        let fixes = vec![
            Position::new(37.33233141, -122.0312186, NOW),
            Position::new(137.0, -122.0312186, NOW + 10),
            Position::new(37.33115792, -122.0312186, NOW + 20),
        ];
        let mut service = service(MonitoringConfig::default(), "walker", fixes);

        assert_eq!(service.poll_location().unwrap(), 2);
        assert_eq!(service.accumulator().fix_count(), 2);
        assert_eq!(service.observer().position.unwrap().latitude, 37.33115792);
    }

    #[test]
    fn test_distance_progress_and_session_end() {
        let mut service = service(MonitoringConfig::default(), "walker", walk());
        assert_eq!(service.poll_location().unwrap(), 4);

        let walked = service.accumulator().current_distance();
        assert!((walked.value() - 300.0).abs() < 0.01);
        assert_eq!(service.displayed_distance(), "0.30 km");

        assert_eq!(service.report_progress().unwrap(), walked);
        assert_eq!(service.end_session().unwrap(), walked);
        assert_eq!(service.progress().readings().len(), 2);
        assert_eq!(service.accumulator().current_distance(), Meters::ZERO);
    }

    #[test]
    fn test_failed_end_session_keeps_distance() {
        let mut service = service(MonitoringConfig::default(), "walker", walk());
        service.poll_location().unwrap();
        service.progress_mut().set_rejecting(true);

        assert!(service.end_session().is_err());
        assert!(service.accumulator().current_distance().value() > 0.0);
    }

    #[test]
    fn test_filter_drops_jitter_but_moves_observer() {
        let config = MonitoringConfig {
            fix_filter: Some(FixFilterConfig::default()),
            ..Default::default()
        };
        let start = Position::new(45.0, 6.0, NOW);
        let wobble = destination(&start.coordinate(), 10.0, Meters(1.0));
        let fixes = vec![start, Position::new(wobble.latitude, wobble.longitude, NOW + 5)];
        let mut service = service(config, "walker", fixes);

        assert_eq!(service.poll_location().unwrap(), 1);
        assert_eq!(service.accumulator().current_distance(), Meters::ZERO);
        assert_eq!(service.observer().position.unwrap().latitude, wobble.latitude);
        assert_eq!(service.filter().unwrap().rejected_count(), 1);
    }

    #[test]
    fn test_collaborator_failures_propagate() {
        let mut service = service(MonitoringConfig::default(), "walker", Vec::new());

        service
            .location_mut()
            .fail_next(CollaboratorError::unavailable("location provider", "permission revoked"));
        let error = service.poll_location().unwrap_err();
        assert!(error.is_recoverable());

        service.repository_mut().set_unavailable(true);
        assert!(service.refresh_roster().is_err());
        assert!(service.roster().is_empty());
    }

    #[test]
    fn test_publish_position() {
        let mut service = service(MonitoringConfig::default(), "walker", vec![Position::new(45.0, 6.0, NOW)]);
        assert!(service.publish_position().is_err());

        service.poll_location().unwrap();
        service.publish_position().unwrap();
        assert_eq!(service.repository().published()[0].0, "walker");
    }

    #[test]
    fn test_update_config_changes_radius() {
        let mut service = service(MonitoringConfig::default(), "walker", vec![Position::new(37.33233141, -122.0312186, NOW)]);
        service.poll_location().unwrap();
        service.refresh_roster().unwrap();
        assert_eq!(service.check_radius_at(NOW).unwrap(), 3);

        let narrower = MonitoringConfig {
            alert_radius_m: 100.0,
            display_unit: DistanceUnit::Meters,
            ..Default::default()
        };
        service.update_config(narrower).unwrap();
        assert_eq!(service.check_radius_at(NOW).unwrap(), 2);

        let invalid = MonitoringConfig { alert_radius_m: -1.0, ..Default::default() };
        assert!(matches!(service.update_config(invalid), Err(MonitoringError::Config(_))));
        assert_eq!(service.config().alert_radius_m, 100.0);

        let classes = service.classify_roster(NOW).unwrap();
        assert_eq!(classes[0].verdict, EntryVerdict::OutOfRadius);
    }
}
