use thiserror::Error;

/// Errors raised while constructing or validating model values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid latitude: {0}. Must be between -90 and 90")]
    InvalidLatitude(f64),
    #[error("Invalid longitude: {0}. Must be between -180 and 180")]
    InvalidLongitude(f64),
    #[error("Invalid glass area for element {id}: {area} m²")]
    InvalidArea { id: String, area: f64 },
    #[error("Invalid technology parameter `{field}`: {value}")]
    InvalidTechnology { field: &'static str, value: f64 },
    #[error("Unknown PV glass technology: {0}")]
    UnknownTechnology(String),
    #[error("Invalid weather record at index {index}: {reason}")]
    InvalidWeatherRecord { index: usize, reason: String },
}
