//! Sun position for a site and local standard time.
//!
//! Declination follows Cooper (1969); the equation of time uses the
//! Spencer-style three-term fit. Local clock time is interpreted against the
//! standard meridian nearest to the site longitude.

use serde::{Deserialize, Serialize};

/// Sun position in the sky, all angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarPosition {
    /// Elevation above the horizon, clamped to [0, 90]
    pub elevation: f64,
    /// Azimuth clockwise from north in [0, 360)
    pub azimuth: f64,
    /// Solar declination
    pub declination: f64,
    /// Hour angle, negative before solar noon
    pub hour_angle: f64,
}

impl SolarPosition {
    pub fn is_above_horizon(&self) -> bool {
        self.elevation > 0.0
    }
}

/// How clock time is converted to solar time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolarTime {
    /// Longitude offset plus equation-of-time correction
    #[default]
    Apparent,
    /// Longitude offset only
    Mean,
}

/// Cooper's declination approximation in degrees.
pub fn declination(day_of_year: f64) -> f64 {
    23.45 * (360.0 / 365.0 * (284.0 + day_of_year)).to_radians().sin()
}

/// Equation of time in minutes.
pub fn equation_of_time(day_of_year: f64) -> f64 {
    let b = (360.0 * (day_of_year - 81.0) / 364.0).to_radians();
    9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin()
}

/// Meridian of the time zone nearest to `longitude`, in degrees.
pub fn standard_meridian(longitude: f64) -> f64 {
    15.0 * (longitude / 15.0).round()
}

/// Local standard clock hour at which the sun crosses the meridian.
pub fn solar_noon(longitude: f64, day_of_year: u16) -> f64 {
    let correction_minutes = 4.0 * (longitude - standard_meridian(longitude)) + equation_of_time(f64::from(day_of_year));
    12.0 - correction_minutes / 60.0
}

/// Sun position using apparent solar time.
pub fn solar_position(latitude: f64, longitude: f64, day_of_year: u16, hour_of_day: f64) -> SolarPosition {
    solar_position_with(latitude, longitude, day_of_year, hour_of_day, SolarTime::Apparent)
}

pub fn solar_position_with(
    latitude: f64,
    longitude: f64,
    day_of_year: u16,
    hour_of_day: f64,
    time: SolarTime,
) -> SolarPosition {
    let n = f64::from(day_of_year);
    let declination_deg = declination(n);

    let mut correction_minutes = 4.0 * (longitude - standard_meridian(longitude));
    if time == SolarTime::Apparent {
        correction_minutes += equation_of_time(n);
    }
    let solar_time = hour_of_day + correction_minutes / 60.0;
    let hour_angle = 15.0 * (solar_time - 12.0);

    let phi = latitude.to_radians();
    let delta = declination_deg.to_radians();
    let h = hour_angle.to_radians();

    let sin_elevation = (phi.sin() * delta.sin() + phi.cos() * delta.cos() * h.cos()).clamp(-1.0, 1.0);
    let elevation = sin_elevation.asin().to_degrees().clamp(0.0, 90.0);

    // North and east components of the sun vector projected on the horizon.
    let north = delta.sin() * phi.cos() - delta.cos() * phi.sin() * h.cos();
    let east = -delta.cos() * h.sin();
    let azimuth = normalize_azimuth(east.atan2(north).to_degrees());

    SolarPosition {
        elevation,
        azimuth,
        declination: declination_deg,
        hour_angle,
    }
}

/// Wrap an angle into [0, 360).
pub fn normalize_azimuth(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MADRID: (f64, f64) = (40.4168, -3.7038);

    #[test]
    fn test_declination_extremes() {
        assert!((declination(172.0) - 23.45).abs() < 0.1);
        assert!((declination(355.0) + 23.45).abs() < 0.1);
        assert!(declination(81.0).abs() < 1.0);
    }

    #[test]
    fn test_summer_noon_madrid() {
        let pos = solar_position(MADRID.0, MADRID.1, 172, 12.0);
        // 90 - 40.4 + 23.45 at true noon; clock noon is ~15 minutes early
        assert!(pos.elevation > 70.0 && pos.elevation < 73.1, "{}", pos.elevation);
        assert!(pos.azimuth > 150.0 && pos.azimuth < 180.0, "{}", pos.azimuth);
    }

    #[test]
    fn test_winter_noon_madrid() {
        let pos = solar_position(MADRID.0, MADRID.1, 355, 12.0);
        assert!(pos.elevation > 24.0 && pos.elevation < 26.5, "{}", pos.elevation);
    }

    #[test]
    fn test_morning_sun_is_east() {
        let pos = solar_position(MADRID.0, MADRID.1, 172, 8.0);
        assert!(pos.is_above_horizon());
        assert!(pos.azimuth > 45.0 && pos.azimuth < 110.0, "{}", pos.azimuth);
        assert!(pos.hour_angle < 0.0);
    }

    #[test]
    fn test_night_is_clamped() {
        let pos = solar_position(MADRID.0, MADRID.1, 10, 0.0);
        assert_eq!(pos.elevation, 0.0);
        assert!(!pos.is_above_horizon());
        assert!((0.0..360.0).contains(&pos.azimuth));
    }

    #[test]
    fn test_mean_time_skips_equation_of_time() {
        // Early November the equation of time is about +16 minutes
        let apparent = solar_position_with(0.0, 0.0, 307, 12.0, SolarTime::Apparent);
        let mean = solar_position_with(0.0, 0.0, 307, 12.0, SolarTime::Mean);
        assert!((mean.hour_angle).abs() < 1e-9);
        assert!((apparent.hour_angle - mean.hour_angle - equation_of_time(307.0) / 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_solar_noon_puts_sun_on_meridian() {
        for day in [15u16, 80, 172, 307, 355] {
            let noon = solar_noon(MADRID.1, day);
            // Madrid sits ~15 minutes west of its standard meridian
            assert!(noon > 11.5 && noon < 13.0, "{}", noon);

            let pos = solar_position(MADRID.0, MADRID.1, day, noon);
            assert!(pos.hour_angle.abs() < 1e-9, "{}", pos.hour_angle);
            assert!((pos.azimuth - 180.0).abs() < 1e-6, "{}", pos.azimuth);
            let expected = 90.0 - MADRID.0 + declination(f64::from(day));
            assert!((pos.elevation - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_normalize_azimuth() {
        assert_eq!(normalize_azimuth(-90.0), 270.0);
        assert_eq!(normalize_azimuth(360.0), 0.0);
        assert_eq!(normalize_azimuth(-1e-18), 0.0);
    }

    proptest! {
        #[test]
        fn elevation_stays_in_bounds(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
            day in 1u16..=365,
            hour in 0.0f64..24.0,
        ) {
            let pos = solar_position(lat, lon, day, hour);
            prop_assert!((0.0..=90.0).contains(&pos.elevation));
        }

        #[test]
        fn azimuth_stays_in_range(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
            day in 1u16..=365,
            hour in 0.0f64..24.0,
        ) {
            let pos = solar_position(lat, lon, day, hour);
            prop_assert!(pos.azimuth >= 0.0 && pos.azimuth < 360.0);
        }
    }
}
