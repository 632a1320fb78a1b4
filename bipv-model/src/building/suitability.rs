use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::building::element::{BuildingElement, Orientation};

/// Orientation/area policy deciding which elements are worth equipping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export, export_to = "./building.ts")]
#[serde(default)]
pub struct SuitabilityPolicy {
    /// Smallest glass area (m²) considered for installation
    pub min_area_m2: f64,
    /// Orientations that are never equipped
    pub excluded_orientations: Vec<Orientation>,
}

impl Default for SuitabilityPolicy {
    fn default() -> Self {
        Self {
            min_area_m2: 1.0,
            excluded_orientations: vec![Orientation::North],
        }
    }
}

impl SuitabilityPolicy {
    pub fn is_suitable(&self, element: &BuildingElement) -> bool {
        element.glass_area_m2.is_finite()
            && element.glass_area_m2 >= self.min_area_m2
            && !self.excluded_orientations.contains(&element.orientation)
    }

    /// Recompute the suitability flag of every element, returning how many passed.
    pub fn apply(&self, elements: &mut [BuildingElement]) -> usize {
        let mut suitable = 0;
        for element in elements.iter_mut() {
            element.suitable = self.is_suitable(element);
            if element.suitable {
                suitable += 1;
            }
        }
        suitable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_policy() {
        let mut elements = vec![
            BuildingElement::new("s", 10.0, Some(180.0)),
            BuildingElement::new("n", 10.0, Some(0.0)),
            BuildingElement::new("tiny", 0.4, Some(90.0)),
            BuildingElement::new("bad", f64::NAN, Some(90.0)),
        ];
        let policy = SuitabilityPolicy::default();
        assert_eq!(policy.apply(&mut elements), 1);
        assert!(elements[0].suitable);
        assert!(!elements[1].suitable);
        assert!(!elements[2].suitable);
        assert!(!elements[3].suitable);

        let permissive = SuitabilityPolicy {
            min_area_m2: 0.0,
            excluded_orientations: vec![],
        };
        assert_eq!(permissive.apply(&mut elements), 3);
    }

    #[test]
    fn test_schema_carries_defaults() {
        let (name, schema) = <SuitabilityPolicy as ToSchema>::schema();
        assert_eq!(name, "SuitabilityPolicy");
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["properties"]["min_area_m2"]["default"], 1.0);
    }
}
