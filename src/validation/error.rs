//! Error taxonomy for the tracking core

use thiserror::Error;

/// Why a position was judged unusable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionIssue {
    Missing,
    NonFinite,
    LatitudeOutOfRange,
    LongitudeOutOfRange,
}

impl PositionIssue {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionIssue::Missing => "position missing",
            PositionIssue::NonFinite => "coordinate is not a finite number",
            PositionIssue::LatitudeOutOfRange => "latitude outside [-90, 90]",
            PositionIssue::LongitudeOutOfRange => "longitude outside [-180, 180]",
        }
    }
}

impl std::fmt::Display for PositionIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures raised by the radius evaluator and the fix intake
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackingError {
    /// The observer has no usable anchor position
    #[error("observer position is unusable: {issue}")]
    InvalidSelfPosition { issue: PositionIssue },
    /// A single roster entry cannot be evaluated; filtered, never escalated
    #[error("roster entry '{display_name}' skipped: {issue}")]
    InvalidRosterEntry { display_name: String, issue: PositionIssue },
    /// A location fix outside geographic bounds
    #[error("rejected fix ({latitude}, {longitude}): {issue}")]
    InvalidFix { latitude: f64, longitude: f64, issue: PositionIssue },
}

impl TrackingError {
    /// Every tracking failure can be retried once the caller supplies better input
    pub fn is_recoverable(&self) -> bool {
        true
    }
}

/// Failures reported by an external collaborator (GPS, repository, notifier, rewards)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("{collaborator} unavailable: {details}")]
    Unavailable { collaborator: String, details: String },
    #[error("{collaborator} returned malformed data: {details}")]
    MalformedData { collaborator: String, details: String },
}

impl CollaboratorError {
    pub fn unavailable(collaborator: impl Into<String>, details: impl Into<String>) -> Self {
        CollaboratorError::Unavailable {
            collaborator: collaborator.into(),
            details: details.into(),
        }
    }

    pub fn malformed(collaborator: impl Into<String>, details: impl Into<String>) -> Self {
        CollaboratorError::MalformedData {
            collaborator: collaborator.into(),
            details: details.into(),
        }
    }

    /// Outages may clear up on their own; malformed payloads will not
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CollaboratorError::Unavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let error = TrackingError::InvalidRosterEntry {
            display_name: "yoyo".to_string(),
            issue: PositionIssue::Missing,
        };
        assert_eq!(error.to_string(), "roster entry 'yoyo' skipped: position missing");

        let error = CollaboratorError::unavailable("roster repository", "timeout");
        assert_eq!(error.to_string(), "roster repository unavailable: timeout");
    }

    #[test]
    fn test_recoverability() {
        assert!(TrackingError::InvalidSelfPosition { issue: PositionIssue::Missing }.is_recoverable());
        assert!(CollaboratorError::unavailable("gps", "no signal").is_recoverable());
        assert!(!CollaboratorError::malformed("roster repository", "bad json").is_recoverable());
    }
}
