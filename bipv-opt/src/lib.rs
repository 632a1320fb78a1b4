pub mod cancel;
pub mod candidate;
pub mod config;
pub mod error;
pub mod general;
pub mod optimizer;
pub mod pipeline;
pub mod plot;
pub mod radiation;
pub mod solar;
pub mod telemetry;
pub mod weather;

// Re-export commonly used items for convenience
pub use cancel::CancellationFlag;
pub use candidate::{TechnologySelection, build_candidates};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use optimizer::{OptimizationOutcome, OptimizerConfig, Solution, optimize};
pub use radiation::{PrecisionTier, RadiationOptions, RadiationResult, calculate_annual_radiation};
pub use solar::{solar_position, surface_irradiance};
