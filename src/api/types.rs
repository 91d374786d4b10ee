//! Common API types

use crate::utils::config::ConfigError;
use crate::validation::{CollaboratorError, TrackingError};
use thiserror::Error;

/// Result type for monitoring operations
pub type MonitoringResult<T> = Result<T, MonitoringError>;

/// Errors surfaced by the monitoring session
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MonitoringError {
    #[error(transparent)]
    Tracking(#[from] TrackingError),
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl MonitoringError {
    /// Whether retrying after fixing the input or waiting can succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            MonitoringError::Tracking(error) => error.is_recoverable(),
            MonitoringError::Collaborator(error) => error.is_recoverable(),
            MonitoringError::Config(_) => false,
        }
    }
}
