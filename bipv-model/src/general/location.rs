use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::error::ModelError;

/// Geographic coordinates for a location (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export, export_to = "./project.ts")]
pub struct Coordinates {
    /// Latitude in decimal degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinates {
    /// Create new coordinates with validation
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ModelError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ModelError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ModelError::InvalidLongitude(longitude));
        }

        Ok(Coordinates {
            latitude,
            longitude,
        })
    }

    /// Whether the location lies south of the equator.
    pub fn is_southern_hemisphere(&self) -> bool {
        self.latitude < 0.0
    }
}

/// The analyzed building.
///
/// Coordinates are optional because projects are created before the site is
/// geolocated; the radiation engine refuses to run until they are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export, export_to = "./project.ts")]
pub struct Project {
    /// Human-readable name for the project
    pub name: String,
    /// Site coordinates
    pub coordinates: Option<Coordinates>,
}

impl Project {
    pub fn new(name: impl Into<String>, coordinates: Option<Coordinates>) -> Self {
        Project {
            name: name.into(),
            coordinates,
        }
    }

    /// Get full display string for the project
    pub fn display(&self) -> String {
        match self.coordinates {
            Some(c) => format!("{} ({:.4}, {:.4})", self.name, c.latitude, c.longitude),
            None => format!("{} (no coordinates)", self.name),
        }
    }
}

impl Default for Project {
    fn default() -> Self {
        // Madrid
        Project::new(
            "Demo building",
            Some(Coordinates {
                latitude: 40.4168,
                longitude: -3.7038,
            }),
        )
    }
}
