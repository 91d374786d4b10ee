//! Core types and constants for proximity tracking

pub mod types;
pub mod constants;
pub mod units;

pub use types::*;
pub use constants::*;
pub use units::{Meters, DistanceUnit};
