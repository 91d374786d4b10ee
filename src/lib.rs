//! Hunt Proximity
//!
//! Proximity core for a hunting-safety companion: alerts an observer when
//! other hunters or walkers come within a configurable radius, and tracks the
//! distance the observer covers during a session.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use core::{Coordinate, DistanceUnit, Meters, Observer, PersonMode, Position, Roster, TrackedPerson};
pub use algorithms::{
    haversine, ActivityArea, DistanceAccumulator, EntryClassification, EntryVerdict, RadiusAlertEvaluator,
    RadiusMatch, SessionState,
};
pub use processing::{FixDecision, FixFilter, FixFilterConfig};
pub use validation::{CollaboratorError, CoordinateValidator, PositionIssue, TrackingError};
pub use utils::{ConfigError, ConfigurationManager, MonitoringConfig};
pub use api::{
    format_distance, AlertDispatcher, LocationProvider, MonitoringError, MonitoringResult, MonitoringService,
    ProgressTracker, TrackedPersonRepository,
};
