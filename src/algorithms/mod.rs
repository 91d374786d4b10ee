//! Proximity and distance algorithms

pub mod great_circle;
pub mod radius;
pub mod accumulator;
pub mod area;

pub use great_circle::{haversine, haversine_coordinates};
pub use radius::{EntryClassification, EntryVerdict, RadiusAlertEvaluator, RadiusMatch};
pub use accumulator::{DistanceAccumulator, SessionState};
pub use area::{ActivityArea, AreaError};
