//! Interfaces to the services the monitoring core depends on
//!
//! Each collaborator is injected into [`MonitoringService`](crate::api::MonitoringService)
//! at construction; nothing in the crate reaches for a global instance.

use crate::algorithms::RadiusMatch;
use crate::core::{Meters, Observer, Position, Roster};
use crate::validation::CollaboratorError;

/// Device location source
pub trait LocationProvider {
    /// Next pending fix.
    /// Returns Ok(None) when no new fix is available.
    fn next_fix(&mut self) -> Result<Option<Position>, CollaboratorError>;
}

/// Remote store of everyone's last reported position
pub trait TrackedPersonRepository {
    /// Fetch the latest roster snapshot
    fn fetch_roster(&mut self) -> Result<Roster, CollaboratorError>;

    /// Publish the observer's own position so others can see it
    fn publish_position(&mut self, observer: &Observer, position: &Position) -> Result<(), CollaboratorError>;
}

/// Turns radius matches into user-visible alerts
pub trait AlertDispatcher {
    fn dispatch(&mut self, matches: &[RadiusMatch<'_>]) -> Result<(), CollaboratorError>;
}

/// Consumes distance readings, e.g. to award points
pub trait ProgressTracker {
    fn record_distance(&mut self, distance: Meters) -> Result<(), CollaboratorError>;
}
