//! Solar geometry: sun position and plane-of-array irradiance.

pub mod irradiance;
pub mod position;

pub use irradiance::{PoaIrradiance, VERTICAL_TILT, poa_components, surface_irradiance, synthetic_dni};
pub use position::{SolarPosition, SolarTime, solar_noon, solar_position, solar_position_with};
