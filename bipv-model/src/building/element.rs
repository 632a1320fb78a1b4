use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::error::ModelError;

/// Cardinal orientation of a facade element, in 45° sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, TS)]
#[ts(export, export_to = "./building.ts")]
pub enum Orientation {
    #[schema(rename = "N")]
    #[serde(rename = "N")]
    North,
    #[schema(rename = "NE")]
    #[serde(rename = "NE")]
    NorthEast,
    #[schema(rename = "E")]
    #[serde(rename = "E")]
    East,
    #[schema(rename = "SE")]
    #[serde(rename = "SE")]
    SouthEast,
    #[schema(rename = "S")]
    #[serde(rename = "S")]
    South,
    #[schema(rename = "SW")]
    #[serde(rename = "SW")]
    SouthWest,
    #[schema(rename = "W")]
    #[serde(rename = "W")]
    West,
    #[schema(rename = "NW")]
    #[serde(rename = "NW")]
    NorthWest,
}

impl Orientation {
    pub const ALL: [Orientation; 8] = [
        Orientation::North,
        Orientation::NorthEast,
        Orientation::East,
        Orientation::SouthEast,
        Orientation::South,
        Orientation::SouthWest,
        Orientation::West,
        Orientation::NorthWest,
    ];

    /// Sector containing `azimuth_deg` (clockwise from north).
    ///
    /// Any finite value is accepted and wrapped into [0, 360); non-finite
    /// input maps to North.
    pub fn from_azimuth(azimuth_deg: f64) -> Self {
        if !azimuth_deg.is_finite() {
            return Orientation::North;
        }
        let azimuth = azimuth_deg.rem_euclid(360.0);
        let sector = ((azimuth + 22.5) / 45.0).floor() as usize % 8;
        Self::ALL[sector]
    }

    /// Azimuth at the center of the sector.
    pub fn nominal_azimuth(&self) -> f64 {
        match self {
            Orientation::North => 0.0,
            Orientation::NorthEast => 45.0,
            Orientation::East => 90.0,
            Orientation::SouthEast => 135.0,
            Orientation::South => 180.0,
            Orientation::SouthWest => 225.0,
            Orientation::West => 270.0,
            Orientation::NorthWest => 315.0,
        }
    }

    /// Reflect across the east-west axis (N <-> S, NE <-> SE, NW <-> SW).
    pub fn mirrored(&self) -> Self {
        match self {
            Orientation::North => Orientation::South,
            Orientation::NorthEast => Orientation::SouthEast,
            Orientation::East => Orientation::East,
            Orientation::SouthEast => Orientation::NorthEast,
            Orientation::South => Orientation::North,
            Orientation::SouthWest => Orientation::NorthWest,
            Orientation::West => Orientation::West,
            Orientation::NorthWest => Orientation::SouthWest,
        }
    }

    /// Short compass code, e.g. "SE".
    pub fn code(&self) -> &'static str {
        match self {
            Orientation::North => "N",
            Orientation::NorthEast => "NE",
            Orientation::East => "E",
            Orientation::SouthEast => "SE",
            Orientation::South => "S",
            Orientation::SouthWest => "SW",
            Orientation::West => "W",
            Orientation::NorthWest => "NW",
        }
    }
}

/// One facade opening (usually a window) that could carry PV glass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export, export_to = "./building.ts")]
pub struct BuildingElement {
    /// Stable identifier from the building import
    pub id: String,
    /// Glass area in m²
    pub glass_area_m2: f64,
    /// Azimuth in degrees clockwise from north, if the import provided one
    pub azimuth_deg: Option<f64>,
    /// Cardinal orientation derived from the (effective) azimuth
    pub orientation: Orientation,
    /// Whether the element passes the current selection policy
    pub suitable: bool,
}

impl BuildingElement {
    /// Create an element and derive its orientation.
    ///
    /// Elements without an azimuth get a pseudo-random one derived from the
    /// identifier, see [`pseudo_azimuth`].
    pub fn new(id: impl Into<String>, glass_area_m2: f64, azimuth_deg: Option<f64>) -> Self {
        let id = id.into();
        let effective = azimuth_deg.unwrap_or_else(|| pseudo_azimuth(&id));
        BuildingElement {
            orientation: Orientation::from_azimuth(effective),
            id,
            glass_area_m2,
            azimuth_deg,
            suitable: true,
        }
    }

    /// Reject areas that are negative or not finite. Zero is allowed and
    /// simply never becomes a candidate.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.glass_area_m2.is_finite() || self.glass_area_m2 < 0.0 {
            return Err(ModelError::InvalidArea {
                id: self.id.clone(),
                area: self.glass_area_m2,
            });
        }
        Ok(())
    }

    /// The azimuth used for calculations.
    pub fn effective_azimuth(&self) -> f64 {
        self.azimuth_deg.unwrap_or_else(|| pseudo_azimuth(&self.id))
    }
}

/// Deterministic azimuth in [0, 360) derived from an identifier (FNV-1a).
///
/// Stable across platforms and releases so repeated imports of the same
/// building give the same orientation.
pub fn pseudo_azimuth(id: &str) -> f64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let hash = id.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    });
    (hash % 36_000) as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_from_azimuth() {
        assert_eq!(Orientation::from_azimuth(0.0), Orientation::North);
        assert_eq!(Orientation::from_azimuth(359.0), Orientation::North);
        assert_eq!(Orientation::from_azimuth(22.4), Orientation::North);
        assert_eq!(Orientation::from_azimuth(22.5), Orientation::NorthEast);
        assert_eq!(Orientation::from_azimuth(90.0), Orientation::East);
        assert_eq!(Orientation::from_azimuth(180.0), Orientation::South);
        assert_eq!(Orientation::from_azimuth(200.0), Orientation::South);
        assert_eq!(Orientation::from_azimuth(225.0), Orientation::SouthWest);
        assert_eq!(Orientation::from_azimuth(-90.0), Orientation::West);
        assert_eq!(Orientation::from_azimuth(f64::NAN), Orientation::North);
    }

    #[test]
    fn test_nominal_azimuth_round_trips() {
        for orientation in Orientation::ALL {
            assert_eq!(
                Orientation::from_azimuth(orientation.nominal_azimuth()),
                orientation
            );
            assert_eq!(orientation.mirrored().mirrored(), orientation);
        }
    }

    #[test]
    fn test_pseudo_azimuth_is_deterministic() {
        let a = pseudo_azimuth("window-17");
        assert_eq!(a, pseudo_azimuth("window-17"));
        assert!((0.0..360.0).contains(&a));
        assert_ne!(a, pseudo_azimuth("window-18"));
    }

    #[test]
    fn test_element_without_azimuth() {
        let element = BuildingElement::new("w-1", 2.5, None);
        assert_eq!(
            element.orientation,
            Orientation::from_azimuth(pseudo_azimuth("w-1"))
        );
        assert_eq!(element.effective_azimuth(), pseudo_azimuth("w-1"));
        assert!(element.suitable);
    }

    #[test]
    fn test_validate_area() {
        assert!(BuildingElement::new("ok", 0.0, Some(90.0)).validate().is_ok());
        assert!(matches!(
            BuildingElement::new("neg", -1.0, Some(90.0)).validate(),
            Err(ModelError::InvalidArea { .. })
        ));
        assert!(BuildingElement::new("nan", f64::NAN, Some(90.0)).validate().is_err());
    }

    #[test]
    fn test_orientation_serializes_as_code() {
        let json = serde_json::to_string(&Orientation::SouthWest).unwrap();
        assert_eq!(json, "\"SW\"");
    }
}
