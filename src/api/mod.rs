//! Session API and collaborator interfaces
//!
//! [`MonitoringService`] ties the radius evaluator and distance accumulator to
//! injected collaborators. In-memory implementations of every collaborator
//! live in [`mock`] for tests and demos.

pub mod collaborators;
pub mod formatting;
pub mod mock;
pub mod monitoring;
pub mod types;

pub use collaborators::{AlertDispatcher, LocationProvider, ProgressTracker, TrackedPersonRepository};
pub use formatting::{format_distance, AlertFormatter, JsonAlertFormatter, TextAlertFormatter};
pub use monitoring::MonitoringService;
pub use types::{MonitoringError, MonitoringResult};
