use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::error::ModelError;

/// Electrical and economic parameters of a PV glass product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export, export_to = "./technology.ts")]
pub struct TechnologyParameters {
    /// Display name of the product family
    pub name: String,
    /// Module conversion efficiency (fraction, e.g. 0.18)
    pub efficiency: f64,
    /// Rated power per active area (W/m²)
    pub power_density_w_m2: f64,
    /// Installed cost per active area (currency/m²)
    pub cost_per_m2: f64,
    /// Fraction of the glass area covered by active material
    pub coverage_factor: f64,
    /// System losses (inverter, wiring, temperature) as a performance ratio
    pub performance_ratio: f64,
}

impl TechnologyParameters {
    pub fn validate(&self) -> Result<(), ModelError> {
        let fraction_fields = [
            ("efficiency", self.efficiency),
            ("coverage_factor", self.coverage_factor),
            ("performance_ratio", self.performance_ratio),
        ];
        for (field, value) in fraction_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ModelError::InvalidTechnology { field, value });
            }
        }
        let positive_fields = [
            ("power_density_w_m2", self.power_density_w_m2),
            ("cost_per_m2", self.cost_per_m2),
        ];
        for (field, value) in positive_fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ModelError::InvalidTechnology { field, value });
            }
        }
        Ok(())
    }

    pub fn with_coverage(mut self, coverage_factor: f64) -> Self {
        self.coverage_factor = coverage_factor;
        self
    }
}

impl Default for TechnologyParameters {
    fn default() -> Self {
        PvGlassTechnology::Monocrystalline.parameters()
    }
}

/// Catalogue of PV glass families commonly offered for facades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, TS)]
#[ts(export, export_to = "./technology.ts")]
pub enum PvGlassTechnology {
    #[schema(rename = "monocrystalline")]
    #[serde(rename = "monocrystalline")]
    Monocrystalline,
    #[schema(rename = "polycrystalline")]
    #[serde(rename = "polycrystalline")]
    Polycrystalline,
    #[schema(rename = "cdte")]
    #[serde(rename = "cdte")]
    CdTeThinFilm,
    #[schema(rename = "cigs")]
    #[serde(rename = "cigs")]
    CigsThinFilm,
    #[schema(rename = "amorphous")]
    #[serde(rename = "amorphous")]
    AmorphousSemiTransparent,
}

impl PvGlassTechnology {
    pub const ALL: [PvGlassTechnology; 5] = [
        PvGlassTechnology::Monocrystalline,
        PvGlassTechnology::Polycrystalline,
        PvGlassTechnology::CdTeThinFilm,
        PvGlassTechnology::CigsThinFilm,
        PvGlassTechnology::AmorphousSemiTransparent,
    ];

    /// Typical catalogue values, 2024 price level.
    pub fn parameters(&self) -> TechnologyParameters {
        let (name, efficiency, power_density_w_m2, cost_per_m2, coverage_factor) = match self {
            PvGlassTechnology::Monocrystalline => ("Monocrystalline glass-glass", 0.20, 200.0, 380.0, 0.85),
            PvGlassTechnology::Polycrystalline => ("Polycrystalline glass-glass", 0.16, 160.0, 300.0, 0.85),
            PvGlassTechnology::CdTeThinFilm => ("CdTe thin film", 0.14, 140.0, 250.0, 0.90),
            PvGlassTechnology::CigsThinFilm => ("CIGS thin film", 0.15, 150.0, 280.0, 0.90),
            PvGlassTechnology::AmorphousSemiTransparent => {
                ("Amorphous silicon semi-transparent", 0.07, 70.0, 200.0, 0.95)
            }
        };
        TechnologyParameters {
            name: name.to_string(),
            efficiency,
            power_density_w_m2,
            cost_per_m2,
            coverage_factor,
            performance_ratio: 0.80,
        }
    }
}

impl FromStr for PvGlassTechnology {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monocrystalline" | "mono" => Ok(PvGlassTechnology::Monocrystalline),
            "polycrystalline" | "poly" => Ok(PvGlassTechnology::Polycrystalline),
            "cdte" => Ok(PvGlassTechnology::CdTeThinFilm),
            "cigs" => Ok(PvGlassTechnology::CigsThinFilm),
            "amorphous" | "a-si" => Ok(PvGlassTechnology::AmorphousSemiTransparent),
            _ => Err(ModelError::UnknownTechnology(s.to_string())),
        }
    }
}
