//! Great-circle distance on a spherical Earth
//!
//! Inputs are degrees, internal math is radians, outputs are [`Meters`].

use crate::core::{Coordinate, Meters, Position, EARTH_MEAN_RADIUS_M};

/// Haversine distance between two fixes
pub fn haversine(from: &Position, to: &Position) -> Meters {
    haversine_coordinates(&from.coordinate(), &to.coordinate())
}

/// Haversine distance between two latitude/longitude pairs
pub fn haversine_coordinates(from: &Coordinate, to: &Coordinate) -> Meters {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points; clamp keeps NaN
    let c = 2.0 * a.sqrt().clamp(0.0, 1.0).asin();

    Meters(EARTH_MEAN_RADIUS_M * c)
}

/// Point reached by travelling `distance` from `origin` along the initial bearing (degrees from north)
pub fn destination(origin: &Coordinate, bearing_deg: f64, distance: Meters) -> Coordinate {
    let angular = distance.value() / EARTH_MEAN_RADIUS_M;
    let bearing = bearing_deg.to_radians();
    let lat1 = origin.latitude.to_radians();
    let lon1 = origin.longitude.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * lat2.sin());

    // Normalize longitude into [-180, 180)
    let longitude = (lon2.to_degrees() + 540.0) % 360.0 - 180.0;
    Coordinate::new(lat2.to_degrees(), longitude)
}
