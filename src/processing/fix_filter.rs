//! Optional smoothing stage for raw location fixes
//!
//! The distance accumulator takes every fix at face value. When GPS jitter
//! would inflate the travelled distance, a `FixFilter` can sit in front of it
//! and drop fixes that barely move (jitter) or that imply an impossible speed
//! (position jumps).

use crate::algorithms::great_circle::haversine;
use crate::core::{Meters, Position};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Thresholds for the fix filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixFilterConfig {
    /// Fixes closer than this to the last accepted fix are treated as jitter (meters)
    pub min_displacement_m: f64,
    /// Fixes implying a faster movement are treated as jumps (meters per second)
    #[serde(default)]
    pub max_speed_mps: Option<f64>,
}

impl Default for FixFilterConfig {
    fn default() -> Self {
        Self {
            min_displacement_m: 3.0,   // typical consumer GPS noise floor
            max_speed_mps: Some(40.0), // well above anyone on foot or in a field vehicle
        }
    }
}

/// Outcome of assessing one fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixDecision {
    Accepted,
    Jitter { displacement: Meters },
    ImplausibleSpeed { speed_mps: f64 },
}

impl FixDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FixDecision::Accepted)
    }
}

/// Stateful jitter/jump filter
#[derive(Debug, Clone)]
pub struct FixFilter {
    config: FixFilterConfig,
    last_accepted: Option<Position>,
    rejected_count: u64,
}

impl FixFilter {
    pub fn new(config: FixFilterConfig) -> Self {
        Self {
            config,
            last_accepted: None,
            rejected_count: 0,
        }
    }

    pub fn config(&self) -> &FixFilterConfig {
        &self.config
    }

    /// Decide whether a fix should reach the accumulator; accepted fixes become the new reference
    pub fn assess(&mut self, fix: &Position) -> FixDecision {
        let decision = match &self.last_accepted {
            None => FixDecision::Accepted,
            Some(previous) => self.compare(previous, fix),
        };

        match decision {
            FixDecision::Accepted => self.last_accepted = Some(*fix),
            rejected => {
                self.rejected_count += 1;
                debug!(latitude = fix.latitude, longitude = fix.longitude, ?rejected, "fix filtered out");
            }
        }

        decision
    }

    fn compare(&self, previous: &Position, fix: &Position) -> FixDecision {
        let displacement = haversine(previous, fix);
        if displacement.value() < self.config.min_displacement_m {
            return FixDecision::Jitter { displacement };
        }

        // Non-increasing timestamps give no usable speed, only the displacement check applies
        let elapsed_s = fix.timestamp.checked_sub(previous.timestamp).filter(|elapsed| *elapsed > 0);
        if let (Some(max_speed), Some(elapsed_s)) = (self.config.max_speed_mps, elapsed_s) {
            let speed_mps = displacement.value() / elapsed_s as f64;
            if speed_mps > max_speed {
                return FixDecision::ImplausibleSpeed { speed_mps };
            }
        }

        FixDecision::Accepted
    }

    pub fn last_accepted(&self) -> Option<&Position> {
        self.last_accepted.as_ref()
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected_count
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
        self.rejected_count = 0;
    }
}
