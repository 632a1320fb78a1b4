use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("project coordinates are missing; geolocate the building before running the radiation analysis")]
    MissingCoordinates,
    #[error("no building elements to analyze; import the facade elements first")]
    EmptyElementList,
    #[error("weather series is empty and synthetic fallback is disabled; load a TMY series or enable `allow_synthetic_weather`")]
    EmptyWeatherSeries,
    #[error("invalid azimuth {azimuth} for element {id}")]
    InvalidAzimuth { id: String, azimuth: f64 },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("no candidate installations to optimize; check element suitability and radiation results")]
    EmptyCandidatePool,
    #[error("numerically unstable evaluation: {0}")]
    NumericalInstability(String),
    #[error("computation cancelled")]
    Cancelled,
    #[error(transparent)]
    Model(#[from] bipv_model::ModelError),
    #[error(transparent)]
    Config(#[from] Box<figment::Error>),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("plot rendering failed: {0}")]
    Plot(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
