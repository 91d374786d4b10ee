//! Input validation and error taxonomy

pub mod data;
pub mod error;

pub use data::CoordinateValidator;
pub use error::{CollaboratorError, PositionIssue, TrackingError};
