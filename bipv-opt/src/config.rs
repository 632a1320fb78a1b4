//! Layered application configuration: defaults, TOML file, environment.

use std::path::{Path, PathBuf};

use bipv_model::{BuildingElement, ModelError, Project, SuitabilityPolicy};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::candidate::TechnologySelection;
use crate::error::Result;
use crate::optimizer::OptimizerConfig;
use crate::radiation::RadiationOptions;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "BIPV__";

/// A facade element as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub id: String,
    pub glass_area_m2: f64,
    #[serde(default)]
    pub azimuth_deg: Option<f64>,
}

impl TryFrom<&ElementSpec> for BuildingElement {
    type Error = ModelError;

    fn try_from(spec: &ElementSpec) -> std::result::Result<Self, Self::Error> {
        let element = BuildingElement::new(spec.id.clone(), spec.glass_area_m2, spec.azimuth_deg);
        element.validate()?;
        Ok(element)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub write_json: bool,
    pub write_plots: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            write_json: true,
            write_plots: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub project: Project,
    /// Facade elements; a demo set is generated when empty
    pub elements: Vec<ElementSpec>,
    pub radiation: RadiationOptions,
    pub technology: TechnologySelection,
    pub optimizer: OptimizerConfig,
    pub suitability: SuitabilityPolicy,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load from `config/default.toml` (if present) and `BIPV__*` variables.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load from an explicit TOML file; a missing file leaves the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config: AppConfig = Self::figment(path).extract()?;
        config.optimizer.validate()?;
        config.technology.resolve()?;
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn building_elements(&self) -> Result<Vec<BuildingElement>> {
        let elements = self
            .elements
            .iter()
            .map(BuildingElement::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radiation::PrecisionTier;
    use bipv_model::PvGlassTechnology;
    use figment::Jail;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = AppConfig::load_from(Path::new("missing.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config, AppConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_toml_and_env_layers() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "bipv.toml",
                r#"
                [project]
                name = "Office block"

                [radiation]
                precision = "daily_peak"

                [technology]
                preset = "cigs"

                [optimizer]
                generations = 12
                weights = { cost = 0.5, yield = 0.5, roi = 0.0 }

                [[elements]]
                id = "w1"
                glass_area_m2 = 4.5
                azimuth_deg = 180.0
                "#,
            )?;
            jail.set_env("BIPV__OPTIMIZER__POPULATION_SIZE", "24");

            let config = AppConfig::load_from(Path::new("bipv.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.project.name, "Office block");
            assert!(config.project.coordinates.is_some(), "coordinates keep their default");
            assert_eq!(config.radiation.precision, PrecisionTier::DailyPeak);
            assert_eq!(config.technology.preset, PvGlassTechnology::CigsThinFilm);
            assert_eq!(config.optimizer.generations, 12);
            assert_eq!(config.optimizer.population_size, 24);
            let elements = config.building_elements().map_err(|e| e.to_string())?;
            assert_eq!(elements[0].orientation, bipv_model::Orientation::South);
            Ok(())
        });
    }

    #[test]
    fn test_negative_area_rejected() {
        let config = AppConfig {
            elements: vec![ElementSpec {
                id: "w1".to_string(),
                glass_area_m2: -2.0,
                azimuth_deg: None,
            }],
            ..Default::default()
        };
        assert!(matches!(
            config.building_elements(),
            Err(crate::Error::Model(ModelError::InvalidArea { .. }))
        ));
    }

    #[test]
    fn test_invalid_weights_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "bad.toml",
                r#"
                [optimizer]
                weights = { cost = 0.9, yield = 0.9, roi = 0.9 }
                "#,
            )?;
            assert!(AppConfig::load_from(Path::new("bad.toml")).is_err());
            Ok(())
        });
    }
}
