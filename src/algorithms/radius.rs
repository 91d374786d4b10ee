//! Radius alert evaluation
//!
//! Given the observer's fix and a roster snapshot, finds everyone currently
//! within the alert radius. The evaluator holds only its thresholds, so a
//! single instance can be shared across threads and evaluations.

use crate::algorithms::great_circle::haversine;
use crate::core::{Meters, Observer, Roster, TrackedPerson};
use crate::utils::config::{validate_alert_radius, validate_max_staleness, ConfigError, MonitoringConfig};
use crate::validation::{CoordinateValidator, TrackingError};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, trace};

/// Per-entry outcome of a radius evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryVerdict {
    InRadius,
    OutOfRadius,
    /// Last report older than the staleness threshold
    Stale,
    /// Missing or out-of-range position
    Invalid,
    /// The observer's own entry
    SelfEntry,
}

/// A roster entry inside the alert radius
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusMatch<'a> {
    pub person: &'a TrackedPerson,
    pub distance: Meters,
}

/// Full classification of one roster entry
#[derive(Debug, Clone, PartialEq)]
pub struct EntryClassification<'a> {
    pub person: &'a TrackedPerson,
    pub verdict: EntryVerdict,
    /// Present whenever a distance could be computed
    pub distance: Option<Meters>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusAlertEvaluator {
    alert_radius: Meters,
    max_staleness_s: Option<f64>,
}

impl RadiusAlertEvaluator {
    pub fn new(alert_radius: Meters) -> Result<Self, ConfigError> {
        validate_alert_radius(alert_radius.value())?;
        Ok(Self {
            alert_radius,
            max_staleness_s: None,
        })
    }

    /// Discard roster entries whose last report is older than `max_staleness_s`
    pub fn with_max_staleness(mut self, max_staleness_s: f64) -> Result<Self, ConfigError> {
        validate_max_staleness(Some(max_staleness_s))?;
        self.max_staleness_s = Some(max_staleness_s);
        Ok(self)
    }

    pub fn from_config(config: &MonitoringConfig) -> Result<Self, ConfigError> {
        let evaluator = Self::new(Meters(config.alert_radius_m))?;
        match config.max_staleness_s {
            Some(max_staleness_s) => evaluator.with_max_staleness(max_staleness_s),
            None => Ok(evaluator),
        }
    }

    pub fn alert_radius(&self) -> Meters {
        self.alert_radius
    }

    pub fn max_staleness_s(&self) -> Option<f64> {
        self.max_staleness_s
    }

    /// Classify every roster entry, in roster order
    pub fn classify<'a>(
        &self,
        observer: &Observer,
        roster: &'a Roster,
        now_s: i64,
    ) -> Result<Vec<EntryClassification<'a>>, TrackingError> {
        let anchor = CoordinateValidator::anchor_position(observer)?;

        let classifications = roster
            .iter()
            .map(|person| {
                if observer.is_same_person(person) {
                    return EntryClassification { person, verdict: EntryVerdict::SelfEntry, distance: None };
                }

                let position = match CoordinateValidator::roster_position(person) {
                    Ok(position) => position,
                    Err(error) => {
                        debug!(display_name = %person.display_name, %error, "excluding roster entry");
                        return EntryClassification { person, verdict: EntryVerdict::Invalid, distance: None };
                    }
                };

                let distance = haversine(anchor, position);

                if let Some(max_staleness_s) = self.max_staleness_s {
                    let age_s = position.age_s(now_s);
                    if age_s as f64 > max_staleness_s {
                        trace!(display_name = %person.display_name, age_s, "roster entry is stale");
                        return EntryClassification { person, verdict: EntryVerdict::Stale, distance: Some(distance) };
                    }
                }

                let verdict = if distance <= self.alert_radius {
                    EntryVerdict::InRadius
                } else {
                    EntryVerdict::OutOfRadius
                };

                EntryClassification { person, verdict, distance: Some(distance) }
            })
            .collect();

        Ok(classifications)
    }

    /// Roster entries within the alert radius of the observer, in roster order
    pub fn evaluate<'a>(
        &self,
        observer: &Observer,
        roster: &'a Roster,
        now_s: i64,
    ) -> Result<Vec<RadiusMatch<'a>>, TrackingError> {
        let matches: Vec<RadiusMatch<'a>> = self
            .classify(observer, roster, now_s)?
            .into_iter()
            .filter_map(|entry| match (entry.verdict, entry.distance) {
                (EntryVerdict::InRadius, Some(distance)) => Some(RadiusMatch { person: entry.person, distance }),
                _ => None,
            })
            .collect();

        debug!(
            roster_size = roster.len(),
            matches = matches.len(),
            radius_m = self.alert_radius.value(),
            "radius evaluation complete"
        );

        Ok(matches)
    }

    /// Same as [`evaluate`](Self::evaluate) using the system clock for staleness
    pub fn evaluate_now<'a>(
        &self,
        observer: &Observer,
        roster: &'a Roster,
    ) -> Result<Vec<RadiusMatch<'a>>, TrackingError> {
        self.evaluate(observer, roster, current_time_s())
    }
}

/// Current system time in seconds since the Unix epoch
pub(crate) fn current_time_s() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
