//! Weather series access for the radiation engine.

use bipv_model::weather::record::HOURS_PER_YEAR;
use bipv_model::{Coordinates, WeatherRecord, WeatherSeries};

use crate::solar::irradiance::{air_mass, extraterrestrial_irradiance};
use crate::solar::solar_position;

/// Nearest-record lookup over a weather series that may be short or unsorted.
pub struct WeatherIndex<'a> {
    series: &'a WeatherSeries,
    /// (hour of year, index into series.records), sorted by hour
    keys: Vec<(u32, usize)>,
    direct: bool,
}

impl<'a> WeatherIndex<'a> {
    pub fn new(series: &'a WeatherSeries) -> Self {
        let direct = series.is_complete()
            && series
                .records
                .iter()
                .enumerate()
                .all(|(i, r)| r.hour_of_year() as usize == i);

        let mut keys: Vec<(u32, usize)> = if direct {
            Vec::new()
        } else {
            series
                .records
                .iter()
                .enumerate()
                .map(|(i, r)| (r.hour_of_year(), i))
                .collect()
        };
        keys.sort_unstable();

        WeatherIndex {
            series,
            keys,
            direct,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Record closest in time to `day_of_year`/`hour`, wrapping around the
    /// year boundary.
    pub fn nearest(&self, day_of_year: u16, hour: u8) -> Option<&'a WeatherRecord> {
        let target = (u32::from(day_of_year).saturating_sub(1)) * 24 + u32::from(hour);
        if self.direct {
            return self.series.records.get(target as usize);
        }
        if self.keys.is_empty() {
            return None;
        }

        let pos = self.keys.partition_point(|(hour, _)| *hour < target);
        let last = self.keys.len() - 1;
        let after = self.keys[if pos > last { 0 } else { pos }];
        let before = self.keys[if pos == 0 { last } else { pos - 1 }];

        let best = if circular_distance(before.0, target) <= circular_distance(after.0, target) {
            before
        } else {
            after
        };
        self.series.records.get(best.1)
    }
}

fn circular_distance(a: u32, b: u32) -> u32 {
    let year = HOURS_PER_YEAR as u32;
    let diff = a.abs_diff(b) % year;
    diff.min(year - diff)
}

/// Deterministic clear-sky weather year for a site.
///
/// Daily clearness varies between 0.55 and 0.90 on a fixed pattern, DNI
/// follows the Meinel attenuation and the diffuse share grows as clearness
/// drops. Good enough for demos and tests; not a substitute for a TMY file.
pub fn synthetic_year(coordinates: &Coordinates) -> WeatherSeries {
    let mut records = Vec::with_capacity(HOURS_PER_YEAR);
    for day in 1..=365u16 {
        let clearness = 0.55 + 0.35 * (0.5 + 0.5 * (f64::from(day) * 2.39996).sin());
        let extraterrestrial = extraterrestrial_irradiance(day);
        let seasonal = 15.0 + 10.0 * (2.0 * std::f64::consts::PI * (f64::from(day) - 110.0) / 365.0).sin();

        for hour in 0..24u8 {
            let temperature = seasonal + 5.0 * (2.0 * std::f64::consts::PI * (f64::from(hour) - 9.0) / 24.0).sin();
            let sun = solar_position(coordinates.latitude, coordinates.longitude, day, f64::from(hour));

            let (ghi, dni, dhi) = if sun.elevation <= 0.0 {
                (0.0, 0.0, 0.0)
            } else {
                let sin_elevation = sun.elevation.to_radians().sin();
                let dni = extraterrestrial * 0.7f64.powf(air_mass(sun.elevation).powf(0.678)) * clearness;
                let dhi = extraterrestrial * sin_elevation * (0.1 + 0.3 * (1.0 - clearness));
                (dni * sin_elevation + dhi, dni, dhi)
            };

            records.push(WeatherRecord {
                day_of_year: day,
                hour,
                ghi,
                dni,
                dhi,
                temperature,
            });
        }
    }
    WeatherSeries::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day_of_year: u16, hour: u8, ghi: f64) -> WeatherRecord {
        WeatherRecord {
            day_of_year,
            hour,
            ghi,
            dni: 0.0,
            dhi: 0.0,
            temperature: 10.0,
        }
    }

    #[test]
    fn test_synthetic_year_shape() {
        let coordinates = Coordinates::new(40.4168, -3.7038).unwrap();
        let series = synthetic_year(&coordinates);
        assert!(series.is_complete());
        assert!(series.validate().is_ok());

        let annual_ghi = series.annual_ghi_kwh_m2();
        assert!(annual_ghi > 1300.0 && annual_ghi < 2300.0, "{}", annual_ghi);

        // Midnight is dark, noon is not
        assert_eq!(series.records[0].ghi, 0.0);
        assert!(series.records[12].ghi > 0.0);
    }

    #[test]
    fn test_direct_lookup_on_complete_series() {
        let coordinates = Coordinates::new(52.5, 13.4).unwrap();
        let series = synthetic_year(&coordinates);
        let index = WeatherIndex::new(&series);
        let rec = index.nearest(100, 13).unwrap();
        assert_eq!((rec.day_of_year, rec.hour), (100, 13));
    }

    #[test]
    fn test_nearest_on_sparse_series() {
        let series = WeatherSeries::new(vec![
            record(10, 12, 1.0),
            record(1, 0, 2.0),
            record(200, 12, 3.0),
            record(365, 20, 4.0),
        ]);
        let index = WeatherIndex::new(&series);
        assert_eq!(index.nearest(10, 14).unwrap().ghi, 1.0);
        assert_eq!(index.nearest(150, 12).unwrap().ghi, 3.0);
        // Wraps across new year
        assert_eq!(index.nearest(365, 23).unwrap().ghi, 2.0);
        assert_eq!(index.nearest(365, 21).unwrap().ghi, 4.0);
    }

    #[test]
    fn test_empty_series() {
        let series = WeatherSeries::default();
        let index = WeatherIndex::new(&series);
        assert!(index.is_empty());
        assert!(index.nearest(1, 12).is_none());
    }
}
