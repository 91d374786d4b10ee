//! Presentation of distances and alerts
//!
//! This is the only place a [`Meters`] value is converted to a display unit.

use crate::algorithms::RadiusMatch;
use crate::core::{DistanceUnit, Meters};
use serde_json::json;

/// Render a distance in the given unit, e.g. `"1.25 km"` or `"230 m"`
pub fn format_distance(distance: Meters, unit: DistanceUnit) -> String {
    let value = distance.in_unit(unit);
    match unit {
        DistanceUnit::Meters => format!("{:.0} {}", value, unit.suffix()),
        DistanceUnit::Kilometers | DistanceUnit::Miles => format!("{:.2} {}", value, unit.suffix()),
    }
}

/// Formats a batch of radius matches for delivery
pub trait AlertFormatter {
    fn format_match(&self, radius_match: &RadiusMatch<'_>) -> String;

    fn format_batch(&self, matches: &[RadiusMatch<'_>]) -> Vec<String> {
        matches.iter().map(|m| self.format_match(m)).collect()
    }
}

/// Human-readable notification text
#[derive(Debug, Clone, Copy)]
pub struct TextAlertFormatter {
    pub unit: DistanceUnit,
}

impl AlertFormatter for TextAlertFormatter {
    fn format_match(&self, radius_match: &RadiusMatch<'_>) -> String {
        format!(
            "{} {} is {} away",
            radius_match.person.mode,
            radius_match.person.display_name,
            format_distance(radius_match.distance, self.unit)
        )
    }
}

/// JSON payload for push services
#[derive(Debug, Clone, Copy)]
pub struct JsonAlertFormatter {
    pub unit: DistanceUnit,
}

impl AlertFormatter for JsonAlertFormatter {
    fn format_match(&self, radius_match: &RadiusMatch<'_>) -> String {
        json!({
            "display_name": radius_match.person.display_name,
            "mode": radius_match.person.mode,
            "distance": radius_match.distance.in_unit(self.unit),
            "unit": self.unit,
        })
        .to_string()
    }
}
