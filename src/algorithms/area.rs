//! Shared activity areas
//!
//! An activity area is a named polygon a user publishes to mark where they
//! hunt or walk. Containment is decided in a local tangent plane centred on the
//! query point, which keeps the test accurate for the few-kilometre areas
//! involved and handles polygons crossing the antimeridian.

use crate::algorithms::great_circle::haversine_coordinates;
use crate::core::{Coordinate, Meters, Roster, TrackedPerson, EARTH_MEAN_RADIUS_M};
use crate::validation::{CoordinateValidator, PositionIssue};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

/// Minimum number of vertices of a usable area
pub const MIN_AREA_VERTICES: usize = 3;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AreaError {
    #[error("area '{name}' has {count} vertices, too few for a polygon")]
    TooFewVertices { name: String, count: usize },
    #[error("area '{name}' vertex {index} is invalid: {issue}")]
    InvalidVertex { name: String, index: usize, issue: PositionIssue },
}

/// Named polygon published by a user.
/// Always holds at least [`MIN_AREA_VERTICES`] valid vertices, also when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawActivityArea")]
pub struct ActivityArea {
    pub name: String,
    /// Seconds since the Unix epoch
    pub created_at: i64,
    vertices: Vec<Coordinate>,
}

/// Wire form of an area before validation
#[derive(Deserialize)]
struct RawActivityArea {
    name: String,
    created_at: i64,
    vertices: Vec<Coordinate>,
}

impl TryFrom<RawActivityArea> for ActivityArea {
    type Error = AreaError;

    fn try_from(raw: RawActivityArea) -> Result<Self, Self::Error> {
        ActivityArea::new(raw.name, raw.created_at, raw.vertices)
    }
}

impl ActivityArea {
    pub fn new(name: impl Into<String>, created_at: i64, vertices: Vec<Coordinate>) -> Result<Self, AreaError> {
        let area = Self {
            name: name.into(),
            created_at,
            vertices,
        };
        area.validate()?;
        Ok(area)
    }

    pub fn validate(&self) -> Result<(), AreaError> {
        if self.vertices.len() < MIN_AREA_VERTICES {
            return Err(AreaError::TooFewVertices {
                name: self.name.clone(),
                count: self.vertices.len(),
            });
        }

        for (index, vertex) in self.vertices.iter().enumerate() {
            CoordinateValidator::validate_coordinate(vertex).map_err(|issue| AreaError::InvalidVertex {
                name: self.name.clone(),
                index,
                issue,
            })?;
        }

        Ok(())
    }

    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    /// Whether a point lies inside the polygon (even-odd rule)
    pub fn contains(&self, point: &Coordinate) -> bool {
        let projected: Vec<Vector2<f64>> = self.vertices.iter().map(|v| to_local(point, v)).collect();

        let Some(&last) = projected.last() else {
            return false;
        };

        let mut inside = false;
        let mut previous = last;
        for &current in &projected {
            // Ray from the origin along +east
            if (current.y > 0.0) != (previous.y > 0.0) {
                let edge = previous - current;
                let crossing_x = current.x - current.y * edge.x / edge.y;
                if crossing_x > 0.0 {
                    inside = !inside;
                }
            }
            previous = current;
        }

        inside
    }

    /// Arithmetic centre of the vertices, computed in the plane of the first vertex
    pub fn centroid(&self) -> Coordinate {
        let origin = self.vertices[0];
        let sum: Vector2<f64> = self.vertices.iter().map(|v| to_local(&origin, v)).sum();
        from_local(&origin, &(sum / self.vertices.len() as f64))
    }

    /// Distance from the centroid to the farthest vertex
    pub fn bounding_radius(&self) -> Meters {
        let centre = self.centroid();
        self.vertices
            .iter()
            .map(|v| haversine_coordinates(&centre, v))
            .fold(Meters::ZERO, |max, d| if d > max { d } else { max })
    }

    pub fn distance_to_centroid(&self, point: &Coordinate) -> Meters {
        haversine_coordinates(point, &self.centroid())
    }

    /// Distance from a point to the area: zero inside, centroid distance outside
    pub fn distance_from(&self, point: &Coordinate) -> Meters {
        if self.contains(point) {
            Meters::ZERO
        } else {
            self.distance_to_centroid(point)
        }
    }

    /// Roster entries currently reported inside the area, in roster order
    pub fn occupants<'a>(&self, roster: &'a Roster) -> Vec<&'a TrackedPerson> {
        roster
            .iter()
            .filter(|person| match CoordinateValidator::roster_position(person) {
                Ok(position) => self.contains(&position.coordinate()),
                Err(_) => false,
            })
            .collect()
    }
}

/// East/north offset (meters) of `point` from `origin` on a local tangent plane
fn to_local(origin: &Coordinate, point: &Coordinate) -> Vector2<f64> {
    let mut delta_lon = (point.longitude - origin.longitude).to_radians();
    if delta_lon > PI {
        delta_lon -= 2.0 * PI;
    } else if delta_lon < -PI {
        delta_lon += 2.0 * PI;
    }
    let delta_lat = (point.latitude - origin.latitude).to_radians();

    Vector2::new(
        EARTH_MEAN_RADIUS_M * origin.latitude.to_radians().cos() * delta_lon,
        EARTH_MEAN_RADIUS_M * delta_lat,
    )
}

fn from_local(origin: &Coordinate, offset: &Vector2<f64>) -> Coordinate {
    let latitude = origin.latitude + (offset.y / EARTH_MEAN_RADIUS_M).to_degrees();
    let longitude = origin.longitude
        + (offset.x / (EARTH_MEAN_RADIUS_M * origin.latitude.to_radians().cos())).to_degrees();
    Coordinate::new(latitude, (longitude + 540.0) % 360.0 - 180.0)
}
