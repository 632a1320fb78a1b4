//! Sizing of PV glass installations from radiation results.

use bipv_model::{BuildingElement, CandidateInstallation, PvGlassTechnology, TechnologyParameters};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::radiation::RadiationResult;

/// Technology choice as configured: a catalogue preset, optionally with
/// overrides, or fully custom parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnologySelection {
    pub preset: PvGlassTechnology,
    pub custom: Option<TechnologyParameters>,
    pub coverage_factor: Option<f64>,
}

impl Default for TechnologySelection {
    fn default() -> Self {
        Self {
            preset: PvGlassTechnology::Monocrystalline,
            custom: None,
            coverage_factor: None,
        }
    }
}

impl TechnologySelection {
    pub fn resolve(&self) -> Result<TechnologyParameters> {
        let mut params = self.custom.clone().unwrap_or_else(|| self.preset.parameters());
        if let Some(coverage) = self.coverage_factor {
            params = params.with_coverage(coverage);
        }
        params.validate()?;
        Ok(params)
    }
}

/// Build one candidate per suitable element with a positive area and a
/// radiation value. Order follows `elements`.
pub fn build_candidates(
    elements: &[BuildingElement],
    radiation: &RadiationResult,
    technology: &TechnologyParameters,
) -> Result<Vec<CandidateInstallation>> {
    technology.validate()?;

    let mut candidates = Vec::with_capacity(elements.len());
    for element in elements.iter().filter(|e| e.suitable) {
        if !element.glass_area_m2.is_finite() || element.glass_area_m2 <= 0.0 {
            debug!(element_id = %element.id, area = element.glass_area_m2, "skipping element without usable area");
            continue;
        }
        let Some(annual_radiation) = radiation.get(&element.id) else {
            warn!(element_id = %element.id, "no radiation result for element, skipping");
            continue;
        };
        candidates.push(size_installation(element, annual_radiation, technology));
    }

    debug!(
        candidates = candidates.len(),
        elements = elements.len(),
        technology = %technology.name,
        "built candidate installations"
    );
    Ok(candidates)
}

fn size_installation(
    element: &BuildingElement,
    annual_radiation_kwh_m2: f64,
    technology: &TechnologyParameters,
) -> CandidateInstallation {
    let active_area_m2 = element.glass_area_m2 * technology.coverage_factor;
    CandidateInstallation {
        element_id: element.id.clone(),
        orientation: element.orientation,
        active_area_m2,
        annual_radiation_kwh_m2,
        capacity_kw: active_area_m2 * technology.power_density_w_m2 / 1000.0,
        annual_energy_kwh: annual_radiation_kwh_m2
            * active_area_m2
            * technology.efficiency
            * technology.performance_ratio,
        cost: active_area_m2 * technology.cost_per_m2,
    }
}
