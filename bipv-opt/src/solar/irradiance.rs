//! Plane-of-array irradiance with the isotropic sky model.

use serde::{Deserialize, Serialize};

/// Ground reflectance used for the reflected component.
pub const ALBEDO: f64 = 0.20;

/// Tilt of a vertical facade in degrees.
pub const VERTICAL_TILT: f64 = 90.0;

/// Components of irradiance on a tilted surface (W/m²).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PoaIrradiance {
    pub direct: f64,
    pub sky_diffuse: f64,
    pub ground_reflected: f64,
}

impl PoaIrradiance {
    pub fn total(&self) -> f64 {
        (self.direct + self.sky_diffuse + self.ground_reflected).max(0.0)
    }
}

/// Cosine of the angle of incidence between the sun and a surface normal,
/// clamped to 0 when the surface faces away from the sun.
pub fn incidence_cosine(
    solar_elevation: f64,
    solar_azimuth: f64,
    surface_azimuth: f64,
    surface_tilt: f64,
) -> f64 {
    let alpha = solar_elevation.to_radians();
    let beta = surface_tilt.to_radians();
    let relative_azimuth = (solar_azimuth - surface_azimuth).to_radians();

    let cos_theta = alpha.cos() * beta.sin() * relative_azimuth.cos() + alpha.sin() * beta.cos();
    cos_theta.clamp(0.0, 1.0)
}

/// Decompose irradiance on a surface.
///
/// With only DNI the result is the direct beam alone. When GHI is supplied
/// the sky-diffuse and ground-reflected components are added; a missing or
/// non-positive DNI is then backfilled from GHI/DHI, and a missing DHI is
/// estimated as the GHI not explained by the beam.
pub fn poa_components(
    dni: Option<f64>,
    solar_elevation: f64,
    solar_azimuth: f64,
    surface_azimuth: f64,
    surface_tilt: f64,
    ghi: Option<f64>,
    dhi: Option<f64>,
) -> PoaIrradiance {
    if solar_elevation <= 0.0 {
        return PoaIrradiance::default();
    }

    let cos_incidence = incidence_cosine(solar_elevation, solar_azimuth, surface_azimuth, surface_tilt);

    let Some(ghi) = ghi.filter(|g| g.is_finite()).map(|g| g.max(0.0)) else {
        let dni = dni.filter(|d| d.is_finite()).unwrap_or(0.0);
        if dni <= 0.0 {
            return PoaIrradiance::default();
        }
        return PoaIrradiance {
            direct: dni * cos_incidence,
            ..Default::default()
        };
    };

    let dhi = dhi.filter(|d| d.is_finite()).map(|d| d.max(0.0));
    let dni = match dni.filter(|d| d.is_finite() && *d > 0.0) {
        Some(dni) => dni,
        None => match dhi {
            Some(dhi) => (ghi - dhi).max(0.0),
            None => ghi * 0.8,
        },
    };
    let dhi = dhi.unwrap_or_else(|| (ghi - dni * solar_elevation.to_radians().sin()).max(0.0));

    let cos_tilt = surface_tilt.to_radians().cos();
    PoaIrradiance {
        direct: dni * cos_incidence,
        sky_diffuse: dhi * (1.0 + cos_tilt) / 2.0,
        ground_reflected: ghi * ALBEDO * (1.0 - cos_tilt) / 2.0,
    }
}

/// Total plane-of-array irradiance in W/m², never negative.
pub fn surface_irradiance(
    dni: Option<f64>,
    solar_elevation: f64,
    solar_azimuth: f64,
    surface_azimuth: f64,
    surface_tilt: f64,
    ghi: Option<f64>,
    dhi: Option<f64>,
) -> f64 {
    poa_components(
        dni,
        solar_elevation,
        solar_azimuth,
        surface_azimuth,
        surface_tilt,
        ghi,
        dhi,
    )
    .total()
}

/// Clear-sky DNI estimate from sun elevation and date only.
///
/// Used when no weather series is available: eccentricity-corrected solar
/// constant attenuated with the Meinel model over the Kasten-Young air mass.
pub fn synthetic_dni(solar_elevation: f64, day_of_year: u16) -> f64 {
    if solar_elevation <= 0.0 {
        return 0.0;
    }
    let extraterrestrial = extraterrestrial_irradiance(day_of_year);
    extraterrestrial * 0.7f64.powf(air_mass(solar_elevation).powf(0.678))
}

/// Solar constant corrected for Earth-Sun distance (W/m²).
pub fn extraterrestrial_irradiance(day_of_year: u16) -> f64 {
    1367.0 * (1.0 + 0.033 * (360.0 * f64::from(day_of_year) / 365.0).to_radians().cos())
}

/// Kasten-Young relative optical air mass.
pub fn air_mass(solar_elevation: f64) -> f64 {
    let elevation = solar_elevation.max(0.0);
    1.0 / (elevation.to_radians().sin() + 0.50572 * (elevation + 6.07995).powf(-1.6364))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_dni_only_mode() {
        // Sun due south at 30°, vertical south facade: cos(30°)
        let value = surface_irradiance(Some(800.0), 30.0, 180.0, 180.0, 90.0, None, None);
        assert!((value - 800.0 * 30f64.to_radians().cos()).abs() < 1e-9);

        assert_eq!(surface_irradiance(Some(-5.0), 30.0, 180.0, 180.0, 90.0, None, None), 0.0);
        assert_eq!(surface_irradiance(None, 30.0, 180.0, 180.0, 90.0, None, None), 0.0);
    }

    #[test]
    fn test_self_shaded_surface_gets_no_beam() {
        let components = poa_components(Some(800.0), 30.0, 180.0, 0.0, 90.0, Some(500.0), Some(100.0));
        assert_eq!(components.direct, 0.0);
        assert!((components.sky_diffuse - 50.0).abs() < 1e-9);
        assert!((components.ground_reflected - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_horizontal_surface_reconstructs_ghi() {
        let elevation: f64 = 50.0;
        let dni = 700.0;
        let dhi = 120.0;
        let ghi = dni * elevation.to_radians().sin() + dhi;
        let value = surface_irradiance(Some(dni), elevation, 200.0, 180.0, 0.0, Some(ghi), Some(dhi));
        assert!((value - ghi).abs() < 1e-6);
    }

    #[test]
    fn test_dni_backfill() {
        // Missing DNI with DHI available: GHI - DHI
        let with_dhi = poa_components(None, 40.0, 180.0, 180.0, 90.0, Some(600.0), Some(150.0));
        let expected = 450.0 * incidence_cosine(40.0, 180.0, 180.0, 90.0);
        assert!((with_dhi.direct - expected).abs() < 1e-9);

        // Missing DNI and DHI: 80% of GHI
        let ghi_only = poa_components(Some(0.0), 40.0, 180.0, 180.0, 90.0, Some(600.0), None);
        let expected = 480.0 * incidence_cosine(40.0, 180.0, 180.0, 90.0);
        assert!((ghi_only.direct - expected).abs() < 1e-9);
        assert!(ghi_only.sky_diffuse >= 0.0);
    }

    #[test]
    fn test_synthetic_dni() {
        assert_eq!(synthetic_dni(0.0, 172), 0.0);
        let high = synthetic_dni(70.0, 172);
        let low = synthetic_dni(10.0, 172);
        assert!(high > 800.0 && high < 1100.0, "{}", high);
        assert!(low < high);
    }

    proptest! {
        #[test]
        fn irradiance_is_never_negative(
            dni in 0.0f64..1200.0,
            ghi in 0.0f64..1200.0,
            dhi in 0.0f64..600.0,
            elevation in -10.0f64..=90.0,
            sun_az in 0.0f64..360.0,
            surface_az in 0.0f64..360.0,
            tilt in 0.0f64..=90.0,
        ) {
            prop_assert!(surface_irradiance(Some(dni), elevation, sun_az, surface_az, tilt, None, None) >= 0.0);
            prop_assert!(surface_irradiance(Some(dni), elevation, sun_az, surface_az, tilt, Some(ghi), Some(dhi)) >= 0.0);
            prop_assert!(surface_irradiance(None, elevation, sun_az, surface_az, tilt, Some(ghi), None) >= 0.0);
        }

        #[test]
        fn no_sun_no_irradiance(
            dni in 0.0f64..1200.0,
            ghi in 0.0f64..1200.0,
            dhi in 0.0f64..600.0,
            elevation in -90.0f64..=0.0,
            surface_az in 0.0f64..360.0,
        ) {
            prop_assert_eq!(surface_irradiance(Some(dni), elevation, 180.0, surface_az, 90.0, Some(ghi), Some(dhi)), 0.0);
        }
    }
}
