use std::cmp::Ordering;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::optimizer::fitness::FitnessEvaluator;

/// A scored installation plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// 1-based position in the ranking
    pub rank: usize,
    /// Inclusion flag per candidate, in candidate order
    pub mask: Vec<bool>,
    pub selected_element_ids: Vec<String>,
    pub capacity_kw: f64,
    pub cost: f64,
    pub annual_energy_kwh: f64,
    pub net_import_reduction_kwh: f64,
    pub net_annual_savings: f64,
    pub roi_percent: f64,
    pub payback_years: Option<f64>,
    pub net_present_value: f64,
    pub coverage_ratio: Option<f64>,
    pub fitness: f64,
}

impl Solution {
    pub fn selected_count(&self) -> usize {
        self.selected_element_ids.len()
    }
}

/// ROI compared at 1e-6 percent resolution so near-equal returns tie and
/// fall through to fitness.
fn roi_key(roi_percent: f64) -> i64 {
    (roi_percent * 1e6).round() as i64
}

/// Turn every distinct observed selection into a [`Solution`], rank by ROI
/// then fitness (both descending) and keep the best `max_solutions`.
///
/// Empty selections and selections that fail to evaluate are dropped.
pub fn rank_solutions(
    evaluator: &FitnessEvaluator<'_>,
    observed: &IndexSet<Vec<bool>>,
    max_solutions: usize,
) -> Vec<Solution> {
    let candidates = evaluator.candidates();

    let mut solutions: Vec<Solution> = observed
        .iter()
        .filter(|mask| mask.iter().any(|selected| *selected))
        .filter_map(|mask| {
            let evaluation = evaluator.evaluate(mask).ok()?;
            let selected_element_ids = candidates
                .iter()
                .zip(mask)
                .filter(|(_, selected)| **selected)
                .map(|(candidate, _)| candidate.element_id.clone())
                .collect();
            Some(Solution {
                rank: 0,
                mask: mask.clone(),
                selected_element_ids,
                capacity_kw: evaluation.capacity_kw,
                cost: evaluation.cost,
                annual_energy_kwh: evaluation.annual_energy_kwh,
                net_import_reduction_kwh: evaluation.net_import_reduction_kwh,
                net_annual_savings: evaluation.investment.net_annual_savings,
                roi_percent: evaluation.investment.roi_percent,
                payback_years: evaluation.investment.payback_years,
                net_present_value: evaluation.investment.net_present_value,
                coverage_ratio: evaluation.coverage_ratio,
                fitness: evaluation.fitness,
            })
        })
        .collect();

    solutions.sort_by(compare_solutions);
    solutions.truncate(max_solutions);
    for (i, solution) in solutions.iter_mut().enumerate() {
        solution.rank = i + 1;
    }
    solutions
}

fn compare_solutions(a: &Solution, b: &Solution) -> Ordering {
    roi_key(b.roi_percent)
        .cmp(&roi_key(a.roi_percent))
        .then_with(|| b.fitness.total_cmp(&a.fitness))
}
