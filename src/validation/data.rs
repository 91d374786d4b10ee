//! Geographic bounds checks for fixes and roster entries

use crate::core::{Coordinate, Observer, Position, TrackedPerson};
use crate::validation::error::{PositionIssue, TrackingError};

/// Coordinate validation utilities
pub struct CoordinateValidator;

impl CoordinateValidator {
    /// Validate WGS84 latitude/longitude bounds
    pub fn validate_coordinate(coordinate: &Coordinate) -> Result<(), PositionIssue> {
        if !coordinate.latitude.is_finite() || !coordinate.longitude.is_finite() {
            return Err(PositionIssue::NonFinite);
        }

        if coordinate.latitude < -90.0 || coordinate.latitude > 90.0 {
            return Err(PositionIssue::LatitudeOutOfRange);
        }

        if coordinate.longitude < -180.0 || coordinate.longitude > 180.0 {
            return Err(PositionIssue::LongitudeOutOfRange);
        }

        Ok(())
    }

    pub fn validate(position: &Position) -> Result<(), PositionIssue> {
        Self::validate_coordinate(&position.coordinate())
    }

    pub fn is_valid(position: &Position) -> bool {
        Self::validate(position).is_ok()
    }

    /// Boundary check applied to every fix before it reaches the accumulator
    pub fn validate_fix(position: &Position) -> Result<(), TrackingError> {
        Self::validate(position).map_err(|issue| TrackingError::InvalidFix {
            latitude: position.latitude,
            longitude: position.longitude,
            issue,
        })
    }

    /// Resolve the observer's anchor position or explain why it cannot be used
    pub fn anchor_position(observer: &Observer) -> Result<&Position, TrackingError> {
        let position = observer
            .position
            .as_ref()
            .ok_or(TrackingError::InvalidSelfPosition { issue: PositionIssue::Missing })?;

        Self::validate(position).map_err(|issue| TrackingError::InvalidSelfPosition { issue })?;
        Ok(position)
    }

    /// Resolve a roster entry's position or describe the defect
    pub fn roster_position(person: &TrackedPerson) -> Result<&Position, TrackingError> {
        let invalid = |issue: PositionIssue| TrackingError::InvalidRosterEntry {
            display_name: person.display_name.clone(),
            issue,
        };

        let position = person.position.as_ref().ok_or_else(|| invalid(PositionIssue::Missing))?;
        Self::validate(position).map_err(invalid)?;
        Ok(position)
    }
}
