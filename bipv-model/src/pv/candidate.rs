use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::building::element::Orientation;

/// A sized PV glass installation for one suitable facade element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export, export_to = "./candidate.ts")]
pub struct CandidateInstallation {
    /// Identifier of the source building element
    pub element_id: String,
    /// Orientation copied from the element
    pub orientation: Orientation,
    /// Area covered by active material (m²)
    pub active_area_m2: f64,
    /// Annual plane-of-array irradiation used for sizing (kWh/m²/year)
    pub annual_radiation_kwh_m2: f64,
    /// Peak capacity (kW)
    pub capacity_kw: f64,
    /// Expected annual yield (kWh/year)
    pub annual_energy_kwh: f64,
    /// Total installed cost
    pub cost: f64,
}

impl CandidateInstallation {
    /// Specific yield in kWh per installed kW.
    pub fn specific_yield(&self) -> f64 {
        if self.capacity_kw > 0.0 {
            self.annual_energy_kwh / self.capacity_kw
        } else {
            0.0
        }
    }
}
