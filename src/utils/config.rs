use crate::core::{DistanceUnit, DEFAULT_ALERT_RADIUS_M};
use crate::processing::fix_filter::FixFilterConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Parameters consumed by the monitoring core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Distance under which another person triggers an alert (meters)
    pub alert_radius_m: f64,
    /// Roster entries older than this are ignored (seconds); `None` keeps every entry
    #[serde(default)]
    pub max_staleness_s: Option<f64>,
    /// Unit used when distances are shown to the user
    #[serde(default)]
    pub display_unit: DistanceUnit,
    /// Smoothing stage placed in front of the distance accumulator
    #[serde(default)]
    pub fix_filter: Option<FixFilterConfig>,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            alert_radius_m: DEFAULT_ALERT_RADIUS_M,
            max_staleness_s: None,
            display_unit: DistanceUnit::Kilometers,
            fix_filter: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Invalid parameter value
    #[error("invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    #[error("I/O error: {message}")]
    IoError { message: String },
    /// JSON serialization/deserialization error
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

impl ConfigError {
    fn invalid(parameter: &str, value: impl ToString, reason: &str) -> Self {
        ConfigError::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Check an alert radius (meters)
pub fn validate_alert_radius(radius_m: f64) -> Result<(), ConfigError> {
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(ConfigError::invalid(
            "alert_radius_m",
            radius_m,
            "alert radius must be a positive, finite number of meters",
        ));
    }
    Ok(())
}

/// Check an optional staleness threshold (seconds)
pub fn validate_max_staleness(max_staleness_s: Option<f64>) -> Result<(), ConfigError> {
    match max_staleness_s {
        Some(value) if !value.is_finite() || value <= 0.0 => Err(ConfigError::invalid(
            "max_staleness_s",
            value,
            "staleness threshold must be a positive, finite number of seconds",
        )),
        _ => Ok(()),
    }
}

/// Check fix filter thresholds
pub fn validate_fix_filter(filter: &FixFilterConfig) -> Result<(), ConfigError> {
    if !filter.min_displacement_m.is_finite() || filter.min_displacement_m < 0.0 {
        return Err(ConfigError::invalid(
            "fix_filter.min_displacement_m",
            filter.min_displacement_m,
            "minimum displacement must be a non-negative number of meters",
        ));
    }

    if let Some(speed) = filter.max_speed_mps {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ConfigError::invalid(
                "fix_filter.max_speed_mps",
                speed,
                "speed ceiling must be a positive number of meters per second",
            ));
        }
    }

    Ok(())
}

/// Validate a whole configuration
pub fn validate_config(config: &MonitoringConfig) -> Result<(), ConfigError> {
    validate_alert_radius(config.alert_radius_m)?;
    validate_max_staleness(config.max_staleness_s)?;
    if let Some(filter) = &config.fix_filter {
        validate_fix_filter(filter)?;
    }
    Ok(())
}

/// Owns the active monitoring configuration and its backing file
#[derive(Debug, Default)]
pub struct ConfigurationManager {
    config: MonitoringConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl ConfigurationManager {
    /// Create a configuration manager with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &MonitoringConfig {
        &self.config
    }

    /// Replace the configuration after validating it
    pub fn update_config(&mut self, config: MonitoringConfig) -> Result<(), ConfigError> {
        validate_config(&config)?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("failed to read config file '{}': {}", path_str, e),
        })?;

        let config: MonitoringConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("failed to parse config file '{}': {}", path_str, e),
            })?;

        validate_config(&config)?;

        info!(path = %path_str, alert_radius_m = config.alert_radius_m, "loaded monitoring configuration");
        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config).map_err(|e| {
            ConfigError::SerializationError {
                message: format!("failed to serialize config: {}", e),
            }
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("failed to write config file '{}': {}", path_str, e),
        })?;

        debug!(path = %path_str, "saved monitoring configuration");
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::IoError {
                message: "no file path set for saving configuration".to_string(),
            }),
        }
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Update the alert radius, returning the previous value
    pub fn set_alert_radius(&mut self, radius_m: f64) -> Result<f64, ConfigError> {
        validate_alert_radius(radius_m)?;
        let old_value = self.config.alert_radius_m;
        self.config.alert_radius_m = radius_m;
        self.is_modified = true;
        Ok(old_value)
    }

    /// Update or clear the staleness threshold, returning the previous value
    pub fn set_max_staleness(&mut self, max_staleness_s: Option<f64>) -> Result<Option<f64>, ConfigError> {
        validate_max_staleness(max_staleness_s)?;
        let old_value = self.config.max_staleness_s;
        self.config.max_staleness_s = max_staleness_s;
        self.is_modified = true;
        Ok(old_value)
    }

    pub fn set_display_unit(&mut self, unit: DistanceUnit) -> DistanceUnit {
        let old_value = self.config.display_unit;
        self.config.display_unit = unit;
        self.is_modified = true;
        old_value
    }

    /// Install or remove the fix smoothing stage
    pub fn set_fix_filter(&mut self, filter: Option<FixFilterConfig>) -> Result<(), ConfigError> {
        if let Some(filter) = &filter {
            validate_fix_filter(filter)?;
        }
        self.config.fix_filter = filter;
        self.is_modified = true;
        Ok(())
    }
}
