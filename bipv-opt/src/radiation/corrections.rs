//! Orientation-dependent factors applied on top of the POA sums.
//!
//! Tables are written for the northern hemisphere; [`equator_relative`]
//! mirrors an orientation so the same tables serve southern sites.

use bipv_model::{Coordinates, Orientation};

/// Lower values below `lower * FAR_BELOW_RATIO` trigger the realism floor.
pub const FAR_BELOW_RATIO: f64 = 0.9;

/// Physically plausible annual irradiation of a vertical facade (kWh/m²/year).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlausibilityBand {
    pub lower: f64,
    pub upper: f64,
}

impl PlausibilityBand {
    pub fn is_far_below(&self, value: f64) -> bool {
        !value.is_finite() || value < self.lower * FAR_BELOW_RATIO
    }
}

/// Orientation as seen from the equator: a north-facing facade in the
/// southern hemisphere behaves like a south-facing one in the northern.
pub fn equator_relative(orientation: Orientation, site: &Coordinates) -> Orientation {
    if site.is_southern_hemisphere() {
        orientation.mirrored()
    } else {
        orientation
    }
}

/// Annual insolation proxy for vertical surfaces by compass direction.
pub fn orientation_correction(orientation: Orientation) -> f64 {
    match orientation {
        Orientation::South => 1.00,
        Orientation::SouthEast | Orientation::SouthWest => 0.95,
        Orientation::East | Orientation::West => 0.85,
        Orientation::NorthEast | Orientation::NorthWest => 0.70,
        Orientation::North => 0.30,
    }
}

/// Typical adjacent-building and self-obstruction losses.
pub fn shading_factor(orientation: Orientation) -> f64 {
    match orientation {
        Orientation::South => 0.95,
        Orientation::SouthEast | Orientation::SouthWest => 0.90,
        Orientation::East | Orientation::West => 0.85,
        Orientation::NorthEast | Orientation::NorthWest => 0.78,
        Orientation::North => 0.70,
    }
}

pub fn plausibility_band(orientation: Orientation) -> PlausibilityBand {
    let (lower, upper) = match orientation {
        Orientation::South => (900.0, 1200.0),
        Orientation::SouthEast | Orientation::SouthWest => (750.0, 1050.0),
        Orientation::East | Orientation::West => (550.0, 800.0),
        Orientation::NorthEast | Orientation::NorthWest => (350.0, 500.0),
        Orientation::North => (200.0, 300.0),
    };
    PlausibilityBand { lower, upper }
}
