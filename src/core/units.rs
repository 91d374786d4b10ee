//! Distance units
//!
//! Distances inside the crate are always [`Meters`]. Conversion to another
//! unit happens only through [`Meters::in_unit`], at presentation time.

use crate::core::constants::{METERS_PER_KILOMETER, METERS_PER_MILE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Distance in meters
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl Meters {
    pub const ZERO: Meters = Meters(0.0);

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn from_kilometers(km: f64) -> Self {
        Meters(km * METERS_PER_KILOMETER)
    }

    /// Express this distance in a display unit
    pub fn in_unit(self, unit: DistanceUnit) -> f64 {
        self.0 * unit.factor_per_meter()
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl Add for Meters {
    type Output = Meters;

    fn add(self, rhs: Meters) -> Meters {
        Meters(self.0 + rhs.0)
    }
}

impl AddAssign for Meters {
    fn add_assign(&mut self, rhs: Meters) {
        self.0 += rhs.0;
    }
}

impl Sum for Meters {
    fn sum<I: Iterator<Item = Meters>>(iter: I) -> Meters {
        iter.fold(Meters::ZERO, Add::add)
    }
}

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} m", self.0)
    }
}

/// Units a distance may be presented in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Meters,
    #[default]
    Kilometers,
    Miles,
}

impl DistanceUnit {
    /// Multiplier converting meters into this unit
    pub fn factor_per_meter(&self) -> f64 {
        match self {
            DistanceUnit::Meters => 1.0,
            DistanceUnit::Kilometers => 1.0 / METERS_PER_KILOMETER,
            DistanceUnit::Miles => 1.0 / METERS_PER_MILE,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            DistanceUnit::Meters => "m",
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
        }
    }
}
