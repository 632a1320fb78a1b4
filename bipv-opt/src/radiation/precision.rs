use serde::{Deserialize, Serialize};
use std::fmt;

/// Cumulative day count before the first of each month (non-leap year).
const DAYS_BEFORE_MONTH: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// First and last sampled hour of the hourly tier (inclusive).
const DAYLIGHT_HOURS: (u8, u8) = (8, 18);

/// Time of day of a sample point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleTime {
    /// Meridian transit of the sun, resolved per site and day
    SolarNoon,
    /// Local standard clock hour
    Hour(u8),
}

/// A representative timestamp sampled for every element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub day_of_year: u16,
    pub time: SampleTime,
}

impl SamplePoint {
    const fn noon(day_of_year: u16) -> Self {
        SamplePoint {
            day_of_year,
            time: SampleTime::SolarNoon,
        }
    }

    const fn at_hour(day_of_year: u16, hour: u8) -> Self {
        SamplePoint {
            day_of_year,
            time: SampleTime::Hour(hour),
        }
    }
}

/// Speed/accuracy trade-off of the radiation aggregation, fastest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecisionTier {
    /// Equinoxes and solstices at solar noon
    #[serde(alias = "yearly")]
    Seasonal,
    /// 15th of each month at solar noon
    #[default]
    Monthly,
    /// Solar noon of every day
    DailyPeak,
    /// Every daylight hour 08:00-18:00 of every day
    Hourly,
}

impl PrecisionTier {
    pub const ALL: [PrecisionTier; 4] = [
        PrecisionTier::Seasonal,
        PrecisionTier::Monthly,
        PrecisionTier::DailyPeak,
        PrecisionTier::Hourly,
    ];

    pub fn sample_points(&self) -> Vec<SamplePoint> {
        match self {
            PrecisionTier::Seasonal => vec![
                SamplePoint::noon(80),
                SamplePoint::noon(172),
                SamplePoint::noon(266),
                SamplePoint::noon(355),
            ],
            PrecisionTier::Monthly => DAYS_BEFORE_MONTH
                .iter()
                .map(|&before| SamplePoint::noon(before + 15))
                .collect(),
            PrecisionTier::DailyPeak => (1..=365).map(SamplePoint::noon).collect(),
            PrecisionTier::Hourly => (1..=365)
                .flat_map(|day| (DAYLIGHT_HOURS.0..=DAYLIGHT_HOURS.1).map(move |hour| SamplePoint::at_hour(day, hour)))
                .collect(),
        }
    }

    /// Factor extrapolating the sampled W·h sum to a full year.
    ///
    /// A noon sample stands in for eight equivalent full-sun hours.
    pub fn scaling_factor(&self) -> f64 {
        match self {
            PrecisionTier::Seasonal => 365.0 * 8.0 / 4.0,
            PrecisionTier::Monthly => 365.0 * 8.0 / 12.0,
            PrecisionTier::DailyPeak => 8.0,
            PrecisionTier::Hourly => 1.0,
        }
    }

    /// Elements per batch; coarse tiers are cheap per element.
    pub fn default_batch_size(&self) -> usize {
        match self {
            PrecisionTier::Seasonal => 500,
            PrecisionTier::Monthly => 250,
            PrecisionTier::DailyPeak => 50,
            PrecisionTier::Hourly => 10,
        }
    }
}

impl fmt::Display for PrecisionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PrecisionTier::Seasonal => "seasonal",
            PrecisionTier::Monthly => "monthly",
            PrecisionTier::DailyPeak => "daily_peak",
            PrecisionTier::Hourly => "hourly",
        };
        f.write_str(label)
    }
}
