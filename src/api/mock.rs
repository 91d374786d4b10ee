//! In-memory collaborators for testing and development

use crate::algorithms::RadiusMatch;
use crate::api::collaborators::{AlertDispatcher, LocationProvider, ProgressTracker, TrackedPersonRepository};
use crate::core::{Meters, Observer, PersonMode, Position, Roster};
use crate::validation::CollaboratorError;
use std::collections::VecDeque;

/// Location provider replaying a queue of fixes
#[derive(Debug, Default)]
pub struct ScriptedLocationProvider {
    fixes: VecDeque<Position>,
    pending_failure: Option<CollaboratorError>,
}

impl ScriptedLocationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixes<I: IntoIterator<Item = Position>>(fixes: I) -> Self {
        Self {
            fixes: fixes.into_iter().collect(),
            pending_failure: None,
        }
    }

    pub fn push_fix(&mut self, fix: Position) {
        self.fixes.push_back(fix);
    }

    /// Make the next read fail once
    pub fn fail_next(&mut self, error: CollaboratorError) {
        self.pending_failure = Some(error);
    }

    pub fn queued_fix_count(&self) -> usize {
        self.fixes.len()
    }
}

impl LocationProvider for ScriptedLocationProvider {
    fn next_fix(&mut self) -> Result<Option<Position>, CollaboratorError> {
        if let Some(error) = self.pending_failure.take() {
            return Err(error);
        }
        Ok(self.fixes.pop_front())
    }
}

/// Repository serving a fixed roster and remembering published positions
#[derive(Debug, Default)]
pub struct StaticRosterRepository {
    roster: Roster,
    published: Vec<(String, Position)>,
    unavailable: bool,
}

impl StaticRosterRepository {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            ..Default::default()
        }
    }

    pub fn set_roster(&mut self, roster: Roster) {
        self.roster = roster;
    }

    /// Simulate connection loss
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    pub fn published(&self) -> &[(String, Position)] {
        &self.published
    }

    fn check_available(&self) -> Result<(), CollaboratorError> {
        if self.unavailable {
            return Err(CollaboratorError::unavailable("roster repository", "simulated outage"));
        }
        Ok(())
    }
}

impl TrackedPersonRepository for StaticRosterRepository {
    fn fetch_roster(&mut self) -> Result<Roster, CollaboratorError> {
        self.check_available()?;
        Ok(self.roster.clone())
    }

    fn publish_position(&mut self, observer: &Observer, position: &Position) -> Result<(), CollaboratorError> {
        self.check_available()?;
        self.published.push((observer.display_name.clone(), *position));
        Ok(())
    }
}

/// Owned copy of one dispatched match
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchedAlert {
    pub display_name: String,
    pub mode: PersonMode,
    pub distance: Meters,
}

/// Dispatcher that keeps every batch it was asked to deliver
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    batches: Vec<Vec<DispatchedAlert>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> &[Vec<DispatchedAlert>] {
        &self.batches
    }

    pub fn last_batch(&self) -> Option<&[DispatchedAlert]> {
        self.batches.last().map(Vec::as_slice)
    }
}

impl AlertDispatcher for RecordingDispatcher {
    fn dispatch(&mut self, matches: &[RadiusMatch<'_>]) -> Result<(), CollaboratorError> {
        let batch = matches
            .iter()
            .map(|m| DispatchedAlert {
                display_name: m.person.display_name.clone(),
                mode: m.person.mode,
                distance: m.distance,
            })
            .collect();
        self.batches.push(batch);
        Ok(())
    }
}

/// Progress tracker that records every reading, optionally refusing them
#[derive(Debug, Default)]
pub struct RecordingProgressTracker {
    readings: Vec<Meters>,
    reject: bool,
}

impl RecordingProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn readings(&self) -> &[Meters] {
        &self.readings
    }

    pub fn set_rejecting(&mut self, reject: bool) {
        self.reject = reject;
    }
}

impl ProgressTracker for RecordingProgressTracker {
    fn record_distance(&mut self, distance: Meters) -> Result<(), CollaboratorError> {
        if self.reject {
            return Err(CollaboratorError::unavailable("progress tracker", "simulated outage"));
        }
        self.readings.push(distance);
        Ok(())
    }
}
