use bipv_model::Orientation;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::general::demand::ElectricityDemand;
use crate::general::finance::FinanceParameters;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Relative importance of the three objectives. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveWeights {
    pub cost: f64,
    #[serde(rename = "yield")]
    pub yield_: f64,
    pub roi: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            cost: 0.3,
            yield_: 0.4,
            roi: 0.3,
        }
    }
}

impl ObjectiveWeights {
    pub fn new(cost: f64, yield_: f64, roi: f64) -> Self {
        Self { cost, yield_, roi }
    }

    pub fn sum(&self) -> f64 {
        self.cost + self.yield_ + self.roi
    }
}

/// System size the owner would like to end up with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min_kw: f64,
    pub max_kw: f64,
}

impl SizeRange {
    pub fn contains(&self, capacity_kw: f64) -> bool {
        capacity_kw >= self.min_kw && capacity_kw <= self.max_kw
    }
}

/// Optional bonus multipliers applied on top of the weighted fitness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Up to +10% for selections facing these orientations
    pub preferred_orientations: Vec<Orientation>,
    /// +5% when the selected capacity falls in this range
    pub size_range: Option<SizeRange>,
    /// Up to +20% scaled by the ROI sub-fitness
    pub prioritize_roi: bool,
}

/// How parents are drawn from the current population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParentSelection {
    /// Any individual with equal probability
    Uniform,
    /// Fittest of `size` randomly drawn individuals
    Tournament { size: usize },
}

impl Default for ParentSelection {
    fn default() -> Self {
        ParentSelection::Tournament { size: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Per-gene bit flip probability
    pub mutation_rate: f64,
    /// Share of the population copied unchanged into the next generation
    pub elite_fraction: f64,
    pub weights: ObjectiveWeights,
    /// Minimum share of the demand the selection should cover, 0 disables
    pub min_coverage: f64,
    /// Fitness multiplier for selections below `min_coverage`
    pub coverage_penalty: f64,
    pub demand: Option<ElectricityDemand>,
    pub finance: FinanceParameters,
    pub preferences: Preferences,
    pub parent_selection: ParentSelection,
    /// Stop early after this many generations without improvement
    pub stall_generations: Option<usize>,
    pub seed: Option<u64>,
    pub max_solutions: usize,
    pub parallel: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 30,
            mutation_rate: 0.05,
            elite_fraction: 0.1,
            weights: ObjectiveWeights::default(),
            min_coverage: 0.0,
            coverage_penalty: 0.5,
            demand: None,
            finance: FinanceParameters::default(),
            preferences: Preferences::default(),
            parent_selection: ParentSelection::default(),
            stall_generations: None,
            seed: None,
            max_solutions: 10,
            parallel: true,
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfiguration(msg));

        if self.population_size < 2 {
            return invalid(format!("population_size must be at least 2, got {}", self.population_size));
        }
        if self.generations < 1 {
            return invalid("generations must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return invalid(format!("mutation_rate must be in [0, 1], got {}", self.mutation_rate));
        }
        if !(0.0..1.0).contains(&self.elite_fraction) {
            return invalid(format!("elite_fraction must be in [0, 1), got {}", self.elite_fraction));
        }

        let w = self.weights;
        if [w.cost, w.yield_, w.roi].iter().any(|v| !v.is_finite() || *v < 0.0) {
            return invalid(format!("objective weights must be non-negative, got {:?}", w));
        }
        if (w.sum() - 1.0).abs() > WEIGHT_TOLERANCE {
            return invalid(format!(
                "objective weights must sum to 1.0, got {:.6}; call balance_weights() to rescale",
                w.sum()
            ));
        }

        if !(0.0..=1.0).contains(&self.min_coverage) {
            return invalid(format!("min_coverage must be in [0, 1], got {}", self.min_coverage));
        }
        if !(0.0..=1.0).contains(&self.coverage_penalty) {
            return invalid(format!("coverage_penalty must be in [0, 1], got {}", self.coverage_penalty));
        }
        if !self.finance.electricity_price.is_finite() || self.finance.electricity_price < 0.0 {
            return invalid(format!(
                "electricity_price must be non-negative, got {}",
                self.finance.electricity_price
            ));
        }
        if let ParentSelection::Tournament { size } = self.parent_selection {
            if size == 0 {
                return invalid("tournament size must be at least 1".to_string());
            }
        }
        if self.max_solutions == 0 {
            return invalid("max_solutions must be at least 1".to_string());
        }
        if let Some(demand) = &self.demand {
            demand.validate()?;
        }
        Ok(())
    }

    /// Rescale the weights so they sum to 1. Falls back to equal weights
    /// when all three are zero.
    pub fn balance_weights(&mut self) {
        let w = &mut self.weights;
        let sum = w.sum();
        if sum > 0.0 && sum.is_finite() {
            w.cost /= sum;
            w.yield_ /= sum;
            w.roi /= sum;
        } else {
            *w = ObjectiveWeights::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0);
        }
    }

    pub fn annual_demand_kwh(&self) -> Option<f64> {
        self.demand.as_ref().map(ElectricityDemand::annual_kwh)
    }
}
