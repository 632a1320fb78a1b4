pub mod building;
pub mod error;
pub mod general;
pub mod pv;
pub mod weather;

pub use building::element::{BuildingElement, Orientation};
pub use building::suitability::SuitabilityPolicy;
pub use error::ModelError;
pub use general::location::{Coordinates, Project};
pub use pv::candidate::CandidateInstallation;
pub use pv::technology::{PvGlassTechnology, TechnologyParameters};
pub use weather::record::{WeatherRecord, WeatherSeries};
