//! Physical constants and default parameters

/// Mean Earth radius used for great-circle distances (meters, IUGG mean radius)
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// Alert radius applied when no configuration overrides it (meters)
pub const DEFAULT_ALERT_RADIUS_M: f64 = 1000.0;

/// Meters in one kilometer
pub const METERS_PER_KILOMETER: f64 = 1000.0;

/// Meters in one statute mile
pub const METERS_PER_MILE: f64 = 1609.344;
