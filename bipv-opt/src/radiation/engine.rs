use std::time::{Duration, Instant};

use bipv_model::{BuildingElement, Coordinates, Orientation, Project, WeatherSeries};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cancel::CancellationFlag;
use crate::error::{Error, Result};
use crate::radiation::corrections::{
    equator_relative, orientation_correction, plausibility_band, shading_factor,
};
use crate::radiation::precision::{PrecisionTier, SampleTime};
use crate::solar::{VERTICAL_TILT, solar_noon, solar_position, surface_irradiance, synthetic_dni};
use crate::weather::WeatherIndex;

/// Options controlling one radiation analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiationOptions {
    pub precision: PrecisionTier,
    /// Multiply by the orientation correction table
    pub orientation_correction: bool,
    /// Multiply by the orientation shading table
    pub shading: bool,
    /// Substitute the plausibility floor for implausibly low results
    pub realism_floor: bool,
    /// Estimate DNI from sun elevation when the weather series is empty
    pub allow_synthetic_weather: bool,
    /// Elements per batch, defaults to the tier's batch size
    pub batch_size: Option<usize>,
    /// Evaluate the elements of a batch on the rayon pool
    pub parallel: bool,
}

impl Default for RadiationOptions {
    fn default() -> Self {
        Self {
            precision: PrecisionTier::Monthly,
            orientation_correction: true,
            shading: true,
            realism_floor: true,
            allow_synthetic_weather: false,
            batch_size: None,
            parallel: true,
        }
    }
}

impl RadiationOptions {
    pub fn with_precision(mut self, precision: PrecisionTier) -> Self {
        self.precision = precision;
        self
    }

    fn effective_batch_size(&self) -> usize {
        self.batch_size
            .unwrap_or_else(|| self.precision.default_batch_size())
            .max(1)
    }
}

/// Non-fatal degradations surfaced next to a successful result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RadiationWarning {
    /// No weather data; DNI was estimated from sun elevation
    SyntheticWeather,
    /// Series shorter than a full year; nearest records were reused
    ShortWeatherSeries { records: usize },
    /// Computed value was implausibly low and replaced by the band floor
    FloorSubstituted { element_id: String, computed: f64, floor: f64 },
    /// The element could not be computed and received the band floor
    ElementFailed { element_id: String, reason: String, floor: f64 },
    /// Two elements share an identifier; the later one wins
    DuplicateElementId { element_id: String },
}

/// Progress after each completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadiationProgress {
    pub batch_index: usize,
    pub completed: usize,
    pub total: usize,
}

/// Annual plane-of-array irradiation per element (kWh/m²/year).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadiationResult {
    pub values: IndexMap<String, f64>,
    pub precision: PrecisionTier,
    /// Number of elements submitted, duplicates included
    pub elements: usize,
    pub sample_points_per_element: usize,
    pub compute_time: Duration,
    pub warnings: Vec<RadiationWarning>,
}

impl RadiationResult {
    pub fn get(&self, element_id: &str) -> Option<f64> {
        self.values.get(element_id).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean value per orientation, in the order orientations first appear.
    pub fn mean_by_orientation(&self, elements: &[BuildingElement]) -> IndexMap<Orientation, f64> {
        let mut sums: IndexMap<Orientation, (f64, usize)> = IndexMap::new();
        for element in elements {
            if let Some(value) = self.get(&element.id) {
                let entry = sums.entry(element.orientation).or_insert((0.0, 0));
                entry.0 += value;
                entry.1 += 1;
            }
        }
        sums.into_iter()
            .map(|(orientation, (sum, count))| (orientation, sum / count as f64))
            .collect()
    }
}

/// Per-timestamp inputs shared by every element of a run.
#[derive(Debug, Clone, Copy)]
struct SunSample {
    elevation: f64,
    azimuth: f64,
    dni: Option<f64>,
    ghi: Option<f64>,
    dhi: Option<f64>,
}

struct ElementOutcome {
    id: String,
    value: f64,
    warning: Option<RadiationWarning>,
}

/// Run the radiation analysis for all elements.
pub fn calculate_annual_radiation(
    project: &Project,
    weather: &WeatherSeries,
    elements: &[BuildingElement],
    options: &RadiationOptions,
) -> Result<RadiationResult> {
    calculate_annual_radiation_with(
        project,
        weather,
        elements,
        options,
        &CancellationFlag::new(),
        |_| {},
    )
}

/// Like [`calculate_annual_radiation`], with cancellation and progress
/// reporting between batches.
pub fn calculate_annual_radiation_with<F>(
    project: &Project,
    weather: &WeatherSeries,
    elements: &[BuildingElement],
    options: &RadiationOptions,
    cancel: &CancellationFlag,
    mut on_progress: F,
) -> Result<RadiationResult>
where
    F: FnMut(RadiationProgress),
{
    let coordinates = project.coordinates.ok_or(Error::MissingCoordinates)?;
    let coordinates = Coordinates::new(coordinates.latitude, coordinates.longitude)?;
    if elements.is_empty() {
        return Err(Error::EmptyElementList);
    }
    if weather.is_empty() && !options.allow_synthetic_weather {
        return Err(Error::EmptyWeatherSeries);
    }
    weather.validate()?;

    let start_time = Instant::now();
    let mut warnings = Vec::new();

    if weather.is_empty() {
        warn!(project = %project.name, "no weather series available, using synthetic DNI estimate");
        warnings.push(RadiationWarning::SyntheticWeather);
    } else if !weather.is_complete() {
        warn!(
            records = weather.len(),
            "weather series is not a full year, nearest records will be reused"
        );
        warnings.push(RadiationWarning::ShortWeatherSeries {
            records: weather.len(),
        });
    }

    let samples = prepare_samples(&coordinates, weather, options.precision);
    let sample_points = options.precision.sample_points().len();
    let batch_size = options.effective_batch_size();
    let total = elements.len();

    info!(
        project = %project.name,
        precision = %options.precision,
        elements = total,
        daylight_samples = samples.len(),
        batch_size,
        "starting radiation analysis"
    );

    let mut values = IndexMap::with_capacity(total);
    let mut completed = 0;

    for (batch_index, batch) in elements.chunks(batch_size).enumerate() {
        cancel.check()?;

        let outcomes: Vec<ElementOutcome> = if options.parallel {
            batch
                .par_iter()
                .map(|element| evaluate_element(element, &samples, &coordinates, options))
                .collect()
        } else {
            batch
                .iter()
                .map(|element| evaluate_element(element, &samples, &coordinates, options))
                .collect()
        };

        for outcome in outcomes {
            if let Some(warning) = outcome.warning {
                warnings.push(warning);
            }
            if values.insert(outcome.id.clone(), outcome.value).is_some() {
                warn!(element_id = %outcome.id, "duplicate element id");
                warnings.push(RadiationWarning::DuplicateElementId {
                    element_id: outcome.id,
                });
            }
        }

        completed += batch.len();
        debug!(batch_index, completed, total, "radiation batch finished");
        on_progress(RadiationProgress {
            batch_index,
            completed,
            total,
        });
    }

    let compute_time = start_time.elapsed();
    info!(
        precision = %options.precision,
        elements = values.len(),
        warnings = warnings.len(),
        elapsed_ms = compute_time.as_millis() as u64,
        "radiation analysis finished"
    );

    Ok(RadiationResult {
        values,
        precision: options.precision,
        elements: total,
        sample_points_per_element: sample_points,
        compute_time,
        warnings,
    })
}

/// Resolve sun position and weather once per sample point, dropping points
/// where the sun is below the horizon.
fn prepare_samples(
    coordinates: &Coordinates,
    weather: &WeatherSeries,
    precision: PrecisionTier,
) -> Vec<SunSample> {
    let index = WeatherIndex::new(weather);

    precision
        .sample_points()
        .into_iter()
        .filter_map(|point| {
            let hour_of_day = match point.time {
                SampleTime::SolarNoon => solar_noon(coordinates.longitude, point.day_of_year),
                SampleTime::Hour(hour) => f64::from(hour),
            };
            let sun = solar_position(coordinates.latitude, coordinates.longitude, point.day_of_year, hour_of_day);
            if sun.elevation <= 0.0 {
                return None;
            }

            // Weather records are hourly; take the one at the nearest clock hour.
            let record_hour = hour_of_day.round().clamp(0.0, 23.0) as u8;
            let sample = match index.nearest(point.day_of_year, record_hour) {
                Some(record) => SunSample {
                    elevation: sun.elevation,
                    azimuth: sun.azimuth,
                    dni: Some(record.dni),
                    ghi: Some(record.ghi),
                    dhi: Some(record.dhi),
                },
                None => SunSample {
                    elevation: sun.elevation,
                    azimuth: sun.azimuth,
                    dni: Some(synthetic_dni(sun.elevation, point.day_of_year)),
                    ghi: None,
                    dhi: None,
                },
            };
            Some(sample)
        })
        .collect()
}

fn evaluate_element(
    element: &BuildingElement,
    samples: &[SunSample],
    coordinates: &Coordinates,
    options: &RadiationOptions,
) -> ElementOutcome {
    let facing = equator_relative(element.orientation, coordinates);
    let band = plausibility_band(facing);

    match element_radiation(element, samples, facing, options) {
        Ok(value) if options.realism_floor && band.is_far_below(value) => {
            debug!(
                element_id = %element.id,
                computed = value,
                floor = band.lower,
                "radiation below plausibility band, substituting floor"
            );
            ElementOutcome {
                id: element.id.clone(),
                value: band.lower,
                warning: Some(RadiationWarning::FloorSubstituted {
                    element_id: element.id.clone(),
                    computed: value,
                    floor: band.lower,
                }),
            }
        }
        Ok(value) => ElementOutcome {
            id: element.id.clone(),
            value,
            warning: None,
        },
        Err(err) => {
            warn!(element_id = %element.id, error = %err, "element radiation failed, using floor");
            ElementOutcome {
                id: element.id.clone(),
                value: band.lower,
                warning: Some(RadiationWarning::ElementFailed {
                    element_id: element.id.clone(),
                    reason: err.to_string(),
                    floor: band.lower,
                }),
            }
        }
    }
}

/// Annual irradiation of one element before the realism floor.
fn element_radiation(
    element: &BuildingElement,
    samples: &[SunSample],
    facing: Orientation,
    options: &RadiationOptions,
) -> Result<f64> {
    let azimuth = element.effective_azimuth();
    if !azimuth.is_finite() || !(0.0..=360.0).contains(&azimuth) {
        return Err(Error::InvalidAzimuth {
            id: element.id.clone(),
            azimuth,
        });
    }

    let watt_hours: f64 = samples
        .iter()
        .map(|s| surface_irradiance(s.dni, s.elevation, s.azimuth, azimuth, VERTICAL_TILT, s.ghi, s.dhi))
        .sum();

    let mut annual = watt_hours * options.precision.scaling_factor() / 1000.0;
    if options.orientation_correction {
        annual *= orientation_correction(facing);
    }
    if options.shading {
        annual *= shading_factor(facing);
    }

    if !annual.is_finite() || annual < 0.0 {
        return Err(Error::NumericalInstability(format!(
            "annual radiation {} for element {}",
            annual, element.id
        )));
    }
    Ok(annual)
}
