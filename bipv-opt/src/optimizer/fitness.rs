//! Scalar fitness of a selection of candidate installations.

use bipv_model::CandidateInstallation;

use crate::error::{Error, Result};
use crate::general::finance::{InvestmentResult, evaluate_investment};
use crate::optimizer::config::OptimizerConfig;

/// ROI at which the ROI sub-fitness saturates (percent).
const ROI_SATURATION: f64 = 50.0;
/// Smallest fitness of a non-degenerate selection.
pub const FITNESS_EPSILON: f64 = 1e-6;

const ORIENTATION_BONUS: f64 = 0.10;
const SIZE_BONUS: f64 = 0.05;
const ROI_BONUS: f64 = 0.20;

/// Upper bound of the bonus multiplier.
pub const MAX_BONUS_MULTIPLIER: f64 = 1.0 + ORIENTATION_BONUS + SIZE_BONUS + ROI_BONUS;

/// Aggregated figures of one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub selected_count: usize,
    pub capacity_kw: f64,
    pub cost: f64,
    pub annual_energy_kwh: f64,
    pub net_import_reduction_kwh: f64,
    pub investment: InvestmentResult,
    /// Share of the annual demand covered, if the demand is known
    pub coverage_ratio: Option<f64>,
    pub fitness: f64,
}

/// Scores selection masks against a fixed candidate pool.
pub struct FitnessEvaluator<'a> {
    candidates: &'a [CandidateInstallation],
    config: &'a OptimizerConfig,
    pool_cost: f64,
    pool_energy: f64,
    annual_demand: Option<f64>,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(candidates: &'a [CandidateInstallation], config: &'a OptimizerConfig) -> Self {
        FitnessEvaluator {
            candidates,
            config,
            pool_cost: candidates.iter().map(|c| c.cost).sum(),
            pool_energy: candidates.iter().map(|c| c.annual_energy_kwh).sum(),
            annual_demand: config.annual_demand_kwh().filter(|d| *d > 0.0),
        }
    }

    pub fn candidates(&self) -> &'a [CandidateInstallation] {
        self.candidates
    }

    /// Fitness of `mask`; evaluation failures score 0.
    pub fn fitness(&self, mask: &[bool]) -> f64 {
        match self.evaluate(mask) {
            Ok(evaluation) => evaluation.fitness,
            Err(_) => 0.0,
        }
    }

    pub fn evaluate(&self, mask: &[bool]) -> Result<Evaluation> {
        if mask.len() != self.candidates.len() {
            return Err(Error::InvalidConfiguration(format!(
                "selection has {} genes for {} candidates",
                mask.len(),
                self.candidates.len()
            )));
        }

        let mut selected_count = 0;
        let mut capacity_kw = 0.0;
        let mut cost = 0.0;
        let mut annual_energy_kwh = 0.0;
        let mut matching_orientation = 0;
        for (candidate, _) in self.candidates.iter().zip(mask).filter(|(_, selected)| **selected) {
            selected_count += 1;
            capacity_kw += candidate.capacity_kw;
            cost += candidate.cost;
            annual_energy_kwh += candidate.annual_energy_kwh;
            if self
                .config
                .preferences
                .preferred_orientations
                .contains(&candidate.orientation)
            {
                matching_orientation += 1;
            }
        }

        if !(capacity_kw.is_finite() && cost.is_finite() && annual_energy_kwh.is_finite()) {
            return Err(Error::NumericalInstability(format!(
                "non-finite aggregate (capacity {}, cost {}, energy {})",
                capacity_kw, cost, annual_energy_kwh
            )));
        }

        let net_import_reduction_kwh = match self.annual_demand {
            Some(demand) => annual_energy_kwh.min(demand),
            None => annual_energy_kwh,
        };
        let investment = evaluate_investment(cost, net_import_reduction_kwh, &self.config.finance);
        let coverage_ratio = self.annual_demand.map(|demand| annual_energy_kwh / demand);

        let fitness = if selected_count == 0 {
            0.0
        } else {
            let fitness = self.score(
                cost,
                annual_energy_kwh,
                capacity_kw,
                investment.roi_percent,
                matching_orientation as f64 / selected_count as f64,
                coverage_ratio,
            );
            if !fitness.is_finite() {
                return Err(Error::NumericalInstability(format!("fitness {}", fitness)));
            }
            if cost > 0.0 && annual_energy_kwh > 0.0 {
                fitness.max(FITNESS_EPSILON)
            } else {
                fitness.max(0.0)
            }
        };

        Ok(Evaluation {
            selected_count,
            capacity_kw,
            cost,
            annual_energy_kwh,
            net_import_reduction_kwh,
            investment,
            coverage_ratio,
            fitness,
        })
    }

    fn score(
        &self,
        cost: f64,
        energy: f64,
        capacity_kw: f64,
        roi_percent: f64,
        orientation_match: f64,
        coverage_ratio: Option<f64>,
    ) -> f64 {
        let weights = &self.config.weights;
        let preferences = &self.config.preferences;

        let cost_fitness = if self.pool_cost > 0.0 {
            1.0 / (1.0 + cost / self.pool_cost)
        } else {
            1.0
        };
        let yield_fitness = if self.pool_energy > 0.0 {
            (energy / self.pool_energy).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let roi_fitness = (roi_percent / ROI_SATURATION).clamp(0.0, 1.0);

        let mut fitness =
            weights.cost * cost_fitness + weights.yield_ * yield_fitness + weights.roi * roi_fitness;

        let mut bonus = 1.0;
        if !preferences.preferred_orientations.is_empty() {
            bonus += ORIENTATION_BONUS * orientation_match;
        }
        if preferences.size_range.is_some_and(|range| range.contains(capacity_kw)) {
            bonus += SIZE_BONUS;
        }
        if preferences.prioritize_roi {
            bonus += ROI_BONUS * roi_fitness;
        }
        fitness *= bonus;

        if self.config.min_coverage > 0.0
            && coverage_ratio.is_some_and(|coverage| coverage < self.config.min_coverage)
        {
            fitness *= self.config.coverage_penalty;
        }
        fitness
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::general::demand::ElectricityDemand;
    use crate::optimizer::config::{ObjectiveWeights, Preferences, SizeRange};
    use bipv_model::Orientation;
    use proptest::prelude::*;

    fn candidate(id: &str, orientation: Orientation, cost: f64, energy: f64) -> CandidateInstallation {
        CandidateInstallation {
            element_id: id.to_string(),
            orientation,
            active_area_m2: cost / 380.0,
            annual_radiation_kwh_m2: 1000.0,
            capacity_kw: cost / 1900.0,
            annual_energy_kwh: energy,
            cost,
        }
    }

    fn pool() -> Vec<CandidateInstallation> {
        vec![
            candidate("s", Orientation::South, 3000.0, 1500.0),
            candidate("e", Orientation::East, 3000.0, 900.0),
            candidate("n", Orientation::North, 3000.0, 300.0),
        ]
    }

    #[test]
    fn test_empty_selection_scores_zero() {
        let candidates = pool();
        let config = OptimizerConfig::default();
        let evaluator = FitnessEvaluator::new(&candidates, &config);
        assert_eq!(evaluator.fitness(&[false, false, false]), 0.0);
    }

    #[test]
    fn test_wrong_length_scores_zero() {
        let candidates = pool();
        let config = OptimizerConfig::default();
        let evaluator = FitnessEvaluator::new(&candidates, &config);
        assert!(evaluator.evaluate(&[true]).is_err());
        assert_eq!(evaluator.fitness(&[true]), 0.0);
    }

    #[test]
    fn test_cost_only_prefers_cheap() {
        let candidates = pool();
        let config = OptimizerConfig {
            weights: ObjectiveWeights::new(1.0, 0.0, 0.0),
            ..Default::default()
        };
        let evaluator = FitnessEvaluator::new(&candidates, &config);
        let one = evaluator.fitness(&[true, false, false]);
        let all = evaluator.fitness(&[true, true, true]);
        assert!((one - 0.75).abs() < 1e-12);
        assert!((all - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_aggregates_and_roi() {
        let candidates = pool();
        let config = OptimizerConfig::default();
        let evaluator = FitnessEvaluator::new(&candidates, &config);
        let evaluation = evaluator.evaluate(&[true, true, false]).unwrap();
        assert_eq!(evaluation.selected_count, 2);
        assert_eq!(evaluation.cost, 6000.0);
        assert_eq!(evaluation.annual_energy_kwh, 2400.0);
        // 2400 * 0.25 - 2% of 6000 = 480
        assert!((evaluation.investment.roi_percent - 8.0).abs() < 1e-9);
        assert_eq!(evaluation.coverage_ratio, None);
    }

    #[test]
    fn test_demand_caps_import_reduction() {
        let candidates = pool();
        let config = OptimizerConfig {
            demand: Some(ElectricityDemand::Annual(1000.0)),
            ..Default::default()
        };
        let evaluator = FitnessEvaluator::new(&candidates, &config);
        let evaluation = evaluator.evaluate(&[true, true, true]).unwrap();
        assert_eq!(evaluation.net_import_reduction_kwh, 1000.0);
        assert_eq!(evaluation.coverage_ratio, Some(2.7));
    }

    #[test]
    fn test_coverage_penalty() {
        let candidates = pool();
        let mut config = OptimizerConfig {
            demand: Some(ElectricityDemand::Annual(2000.0)),
            ..Default::default()
        };
        let unconstrained = FitnessEvaluator::new(&candidates, &config).fitness(&[false, false, true]);
        config.min_coverage = 0.5;
        let penalized = FitnessEvaluator::new(&candidates, &config).fitness(&[false, false, true]);
        assert!((penalized - unconstrained * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_orientation_and_size_bonus() {
        let candidates = pool();
        let plain = OptimizerConfig::default();
        let preferred = OptimizerConfig {
            preferences: Preferences {
                preferred_orientations: vec![Orientation::South],
                size_range: Some(SizeRange {
                    min_kw: 0.0,
                    max_kw: 2.0,
                }),
                prioritize_roi: false,
            },
            ..Default::default()
        };
        let base = FitnessEvaluator::new(&candidates, &plain).fitness(&[true, false, false]);
        let boosted = FitnessEvaluator::new(&candidates, &preferred).fitness(&[true, false, false]);
        assert!((boosted - base * 1.15).abs() < 1e-12);
    }

    #[test]
    fn test_zero_yield_selection_is_not_floored() {
        let candidates = vec![candidate("dark", Orientation::North, 1000.0, 0.0)];
        let config = OptimizerConfig {
            weights: ObjectiveWeights::new(0.0, 1.0, 0.0),
            ..Default::default()
        };
        let evaluator = FitnessEvaluator::new(&candidates, &config);
        assert_eq!(evaluator.fitness(&[true]), 0.0);
    }

    fn weights_strategy() -> impl Strategy<Value = ObjectiveWeights> {
        (0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0).prop_map(|(a, b, c)| {
            let sum = a + b + c;
            if sum <= 0.0 {
                ObjectiveWeights::new(1.0, 0.0, 0.0)
            } else {
                ObjectiveWeights::new(a / sum, b / sum, c / sum)
            }
        })
    }

    proptest! {
        #[test]
        fn non_degenerate_selections_score_positive(
            costs in prop::collection::vec(1.0f64..10_000.0, 1..12),
            yields in prop::collection::vec(1.0f64..5_000.0, 12),
            mask_bits in prop::collection::vec(any::<bool>(), 12),
            weights in weights_strategy(),
        ) {
            let candidates: Vec<_> = costs
                .iter()
                .zip(&yields)
                .enumerate()
                .map(|(i, (c, y))| candidate(&i.to_string(), Orientation::ALL[i % 8], *c, *y))
                .collect();
            let mut mask: Vec<bool> = mask_bits[..candidates.len()].to_vec();
            mask[0] = true;
            let config = OptimizerConfig { weights, ..Default::default() };
            let evaluator = FitnessEvaluator::new(&candidates, &config);
            prop_assert!(evaluator.fitness(&mask) > 0.0);
        }

        #[test]
        fn fitness_stays_in_normalized_range(
            costs in prop::collection::vec(0.0f64..10_000.0, 1..12),
            yields in prop::collection::vec(0.0f64..5_000.0, 12),
            mask_bits in prop::collection::vec(any::<bool>(), 12),
            weights in weights_strategy(),
            prioritize_roi in any::<bool>(),
            price in 0.0f64..2.0,
        ) {
            let candidates: Vec<_> = costs
                .iter()
                .zip(&yields)
                .enumerate()
                .map(|(i, (c, y))| candidate(&i.to_string(), Orientation::ALL[i % 8], *c, *y))
                .collect();
            let mask = &mask_bits[..candidates.len()];
            let mut config = OptimizerConfig {
                weights,
                preferences: Preferences {
                    preferred_orientations: vec![Orientation::South, Orientation::East],
                    size_range: Some(SizeRange { min_kw: 0.0, max_kw: 10.0 }),
                    prioritize_roi,
                },
                ..Default::default()
            };
            config.finance.electricity_price = price;
            let evaluator = FitnessEvaluator::new(&candidates, &config);
            let fitness = evaluator.fitness(mask);
            prop_assert!(fitness >= 0.0);
            prop_assert!(fitness <= MAX_BONUS_MULTIPLIER + 1e-9, "fitness {}", fitness);
        }
    }
}
