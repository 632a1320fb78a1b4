use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::error::ModelError;

/// Hours in a non-leap Typical Meteorological Year.
pub const HOURS_PER_YEAR: usize = 8760;

/// One hourly observation of a TMY series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export, export_to = "./weather.ts")]
pub struct WeatherRecord {
    /// Day of year (1-365)
    pub day_of_year: u16,
    /// Hour of day, local standard time (0-23)
    pub hour: u8,
    /// Global horizontal irradiance (W/m²)
    pub ghi: f64,
    /// Direct normal irradiance (W/m²)
    pub dni: f64,
    /// Diffuse horizontal irradiance (W/m²)
    pub dhi: f64,
    /// Ambient dry-bulb temperature (°C)
    pub temperature: f64,
}

impl WeatherRecord {
    /// Zero-based hour index within the year.
    pub fn hour_of_year(&self) -> u32 {
        (u32::from(self.day_of_year).saturating_sub(1)) * 24 + u32::from(self.hour)
    }
}

/// An ordered hourly weather year, ideally 8760 records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export, export_to = "./weather.ts")]
pub struct WeatherSeries {
    pub records: Vec<WeatherRecord>,
}

impl WeatherSeries {
    pub fn new(records: Vec<WeatherRecord>) -> Self {
        WeatherSeries { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when the series covers a full non-leap year.
    pub fn is_complete(&self) -> bool {
        self.records.len() == HOURS_PER_YEAR
    }

    /// Check day/hour ranges and that irradiance values are finite.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (index, record) in self.records.iter().enumerate() {
            if !(1..=366).contains(&record.day_of_year) {
                return Err(ModelError::InvalidWeatherRecord {
                    index,
                    reason: format!("day of year {} out of range", record.day_of_year),
                });
            }
            if record.hour > 23 {
                return Err(ModelError::InvalidWeatherRecord {
                    index,
                    reason: format!("hour {} out of range", record.hour),
                });
            }
            if !(record.ghi.is_finite() && record.dni.is_finite() && record.dhi.is_finite()) {
                return Err(ModelError::InvalidWeatherRecord {
                    index,
                    reason: "non-finite irradiance".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Sum of GHI over the series in kWh/m².
    pub fn annual_ghi_kwh_m2(&self) -> f64 {
        self.records.iter().map(|r| r.ghi.max(0.0)).sum::<f64>() / 1000.0
    }
}
