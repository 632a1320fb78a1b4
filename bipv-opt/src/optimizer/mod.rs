//! Genetic search for the best subset of candidate installations.

pub mod config;
pub mod fitness;
pub mod genetic;
pub mod solution;

pub use config::{ObjectiveWeights, OptimizerConfig, ParentSelection, Preferences, SizeRange};
pub use fitness::{Evaluation, FitnessEvaluator};
pub use genetic::{GenerationProgress, Individual, OptimizationOutcome, optimize, optimize_with};
pub use solution::Solution;
