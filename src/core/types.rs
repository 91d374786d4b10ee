//! Core data types for proximity tracking

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Latitude/longitude pair in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Geographic fix in WGS84 degrees with the time it was recorded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Seconds since the Unix epoch
    pub timestamp: i64,
}

impl From<Position> for Coordinate {
    fn from(position: Position) -> Self {
        position.coordinate()
    }
}

impl Position {
    pub fn new(latitude: f64, longitude: f64, timestamp: i64) -> Self {
        Self { latitude, longitude, timestamp }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Age of this fix relative to `now_s`, clamped at zero for fixes stamped in the future
    pub fn age_s(&self, now_s: i64) -> i64 {
        now_s.saturating_sub(self.timestamp).max(0)
    }
}

/// Activity a tracked person declared for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonMode {
    Hunter,
    Walker,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PersonMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonMode::Hunter => "hunter",
            PersonMode::Walker => "walker",
            PersonMode::Unknown => "unknown",
        }
    }
}

impl FromStr for PersonMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "hunter" => PersonMode::Hunter,
            "walker" => PersonMode::Walker,
            _ => PersonMode::Unknown,
        })
    }
}

impl fmt::Display for PersonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Another person's last reported position as seen in a roster snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedPerson {
    /// Display name, used as the identity key
    pub display_name: String,
    /// `None` when the backing store returned no position or a malformed one
    #[serde(default, deserialize_with = "lenient_position")]
    pub position: Option<Position>,
    #[serde(default, deserialize_with = "lenient_mode")]
    pub mode: PersonMode,
}

// A bad field invalidates its entry, never the whole snapshot
fn lenient_position<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Position>, D::Error> {
    let Some(value) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match Position::deserialize(value) {
        Ok(position) => Ok(Some(position)),
        Err(error) => {
            debug!(%error, "malformed roster position");
            Ok(None)
        }
    }
}

fn lenient_mode<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PersonMode, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| PersonMode::deserialize(v).ok()).unwrap_or_default())
}

impl TrackedPerson {
    pub fn new(display_name: impl Into<String>, position: Position, mode: PersonMode) -> Self {
        Self {
            display_name: display_name.into(),
            position: Some(position),
            mode,
        }
    }

    pub fn without_position(display_name: impl Into<String>, mode: PersonMode) -> Self {
        Self {
            display_name: display_name.into(),
            position: None,
            mode,
        }
    }
}

/// Latest snapshot of everyone else being tracked, in repository order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    entries: Vec<TrackedPerson>,
}

impl Roster {
    pub fn new(entries: Vec<TrackedPerson>) -> Self {
        Self { entries }
    }

    /// Parse a snapshot as delivered by the repository (a JSON array of entries)
    pub fn from_json(snapshot: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(snapshot)
    }

    pub fn entries(&self) -> &[TrackedPerson] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackedPerson> {
        self.entries.iter()
    }
}

impl From<Vec<TrackedPerson>> for Roster {
    fn from(entries: Vec<TrackedPerson>) -> Self {
        Self::new(entries)
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a TrackedPerson;
    type IntoIter = std::slice::Iter<'a, TrackedPerson>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The current user: identity, declared mode and latest own fix
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    pub display_name: String,
    pub mode: PersonMode,
    pub position: Option<Position>,
}

impl Observer {
    pub fn new(display_name: impl Into<String>, mode: PersonMode) -> Self {
        Self {
            display_name: display_name.into(),
            mode,
            position: None,
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Whether a roster entry refers to this observer
    pub fn is_same_person(&self, person: &TrackedPerson) -> bool {
        self.display_name == person.display_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_mode_parsing_defaults_to_unknown() {
        assert_eq!("hunter".parse::<PersonMode>().unwrap(), PersonMode::Hunter);
        assert_eq!(" Walker ".parse::<PersonMode>().unwrap(), PersonMode::Walker);
        assert_eq!("fisher".parse::<PersonMode>().unwrap(), PersonMode::Unknown);
        assert_eq!("".parse::<PersonMode>().unwrap(), PersonMode::Unknown);
    }

    #[test]
    fn test_roster_snapshot_parsing() {
        let snapshot = r#"[
            {"display_name": "yoan83", "position": {"latitude": 37.33070248, "longitude": -122.02957434, "timestamp": 1663142183}, "mode": "hunter"},
            {"display_name": "ghost", "position": null, "mode": "poacher"},
            {"display_name": "walker1", "position": {"latitude": 45.0, "longitude": 5.0, "timestamp": 1663142000}}
        ]"#;

        let roster = Roster::from_json(snapshot).unwrap();
        assert_eq!(roster.len(), 3);

        let entries = roster.entries();
        assert_eq!(entries[0].mode, PersonMode::Hunter);
        assert_eq!(entries[0].position.unwrap().timestamp, 1663142183);
        assert!(entries[1].position.is_none());
        assert_eq!(entries[1].mode, PersonMode::Unknown);
        assert_eq!(entries[2].mode, PersonMode::Unknown);
    }

    #[test]
    fn test_malformed_position_invalidates_only_its_entry() {
        let snapshot = r#"[
            { "display_name": "yoan83", "position": { "latitude": 37.33070248, "longitude": -122.02957434, "timestamp": 1663142183 }, "mode": "hunter" },
            { "display_name": "bad", "position": { "latitude": 37.3, "longitude": -122.0 }, "mode": "hunter" },
            { "display_name": "typo", "position": { "latitude": "37.3", "longitude": -122.0, "timestamp": 0 }, "mode": 7 },
            { "display_name": "yoyo", "position": { "latitude": 37.33233141, "longitude": -122.0312186, "timestamp": 1663142183 }, "mode": "walker" }
        ]"#;

        let roster = Roster::from_json(snapshot).unwrap();
        assert_eq!(roster.len(), 4);
        assert!(roster.entries()[0].position.is_some());
        assert!(roster.entries()[1].position.is_none());
        assert_eq!(roster.entries()[1].mode, PersonMode::Hunter);
        assert!(roster.entries()[2].position.is_none());
        assert_eq!(roster.entries()[2].mode, PersonMode::Unknown);
        assert_eq!(roster.entries()[3].mode, PersonMode::Walker);
    }

    #[test]
    fn test_position_age_is_clamped() {
        let position = Position::new(0.0, 0.0, 1_000);
        assert_eq!(position.age_s(1_060), 60);
        assert_eq!(position.age_s(900), 0);
    }

    #[test]
    fn test_observer_identity() {
        let observer = Observer::new("yoan8306", PersonMode::Walker);
        let me = TrackedPerson::without_position("yoan8306", PersonMode::Walker);
        let other = TrackedPerson::without_position("yoyo", PersonMode::Hunter);

        assert!(observer.is_same_person(&me));
        assert!(!observer.is_same_person(&other));
    }
}
