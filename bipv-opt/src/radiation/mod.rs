//! Annual facade irradiation at selectable precision.

pub mod corrections;
pub mod engine;
pub mod precision;

pub use engine::{
    RadiationOptions, RadiationProgress, RadiationResult, RadiationWarning, calculate_annual_radiation,
    calculate_annual_radiation_with,
};
pub use precision::{PrecisionTier, SamplePoint, SampleTime};
