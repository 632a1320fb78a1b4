use std::time::{Duration, Instant};

use bipv_model::CandidateInstallation;
use indexmap::IndexSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cancel::CancellationFlag;
use crate::error::{Error, Result};
use crate::optimizer::config::{OptimizerConfig, ParentSelection};
use crate::optimizer::fitness::FitnessEvaluator;
use crate::optimizer::solution::{Solution, rank_solutions};

/// Inclusion flag per candidate.
pub type Individual = Vec<bool>;

/// Progress after each evaluated generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationProgress {
    /// 0-based
    pub generation: usize,
    pub total: usize,
    pub best_fitness: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    /// Ranked by ROI, best first
    pub solutions: Vec<Solution>,
    /// Best fitness of each evaluated generation
    pub best_fitness_history: Vec<f64>,
    pub generations_run: usize,
    /// Fitness evaluations performed, duplicates included
    pub evaluations: usize,
    /// Distinct selections seen across all generations
    pub unique_individuals: usize,
    pub compute_time: Duration,
}

impl OptimizationOutcome {
    pub fn best(&self) -> Option<&Solution> {
        self.solutions.first()
    }
}

/// Select a subset of `candidates` with a generational genetic algorithm.
pub fn optimize(candidates: &[CandidateInstallation], config: &OptimizerConfig) -> Result<OptimizationOutcome> {
    optimize_with(candidates, config, &CancellationFlag::new(), |_| {})
}

/// Like [`optimize`], with cancellation checked before each generation and
/// a progress callback after it.
pub fn optimize_with<F>(
    candidates: &[CandidateInstallation],
    config: &OptimizerConfig,
    cancel: &CancellationFlag,
    mut on_progress: F,
) -> Result<OptimizationOutcome>
where
    F: FnMut(GenerationProgress),
{
    config.validate()?;
    if candidates.is_empty() {
        return Err(Error::EmptyCandidatePool);
    }

    let start_time = Instant::now();
    let evaluator = FitnessEvaluator::new(candidates, config);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        candidates = candidates.len(),
        population = config.population_size,
        generations = config.generations,
        seed = ?config.seed,
        "starting optimization"
    );

    let mut population: Vec<Individual> = (0..config.population_size)
        .map(|_| random_individual(candidates.len(), &mut rng))
        .collect();

    let mut observed: IndexSet<Individual> = IndexSet::new();
    let mut best_fitness_history = Vec::with_capacity(config.generations);
    let mut evaluations = 0;
    let mut best_so_far = f64::NEG_INFINITY;
    let mut stalled = 0;

    for generation in 0..config.generations {
        cancel.check()?;

        let fitness = evaluate_population(&evaluator, &population, config.parallel);
        evaluations += fitness.len();
        observed.extend(population.iter().cloned());

        let best_fitness = fitness.iter().copied().fold(0.0, f64::max);
        best_fitness_history.push(best_fitness);
        debug!(generation, best_fitness, unique = observed.len(), "generation evaluated");
        on_progress(GenerationProgress {
            generation,
            total: config.generations,
            best_fitness,
        });

        if best_fitness > best_so_far {
            best_so_far = best_fitness;
            stalled = 0;
        } else {
            stalled += 1;
        }
        if config.stall_generations.is_some_and(|limit| stalled >= limit) {
            info!(generation, stalled, "no improvement, stopping early");
            break;
        }

        if generation + 1 < config.generations {
            population = next_generation(&population, &fitness, config, &mut rng);
        }
    }

    let solutions = rank_solutions(&evaluator, &observed, config.max_solutions);
    let compute_time = start_time.elapsed();

    info!(
        generations = best_fitness_history.len(),
        evaluations,
        unique = observed.len(),
        best_roi = solutions.first().map(|s| s.roi_percent),
        elapsed_ms = compute_time.as_millis() as u64,
        "optimization finished"
    );

    Ok(OptimizationOutcome {
        solutions,
        generations_run: best_fitness_history.len(),
        best_fitness_history,
        evaluations,
        unique_individuals: observed.len(),
        compute_time,
    })
}

fn random_individual<R: Rng>(genes: usize, rng: &mut R) -> Individual {
    (0..genes).map(|_| rng.gen_bool(0.5)).collect()
}

fn evaluate_population(evaluator: &FitnessEvaluator<'_>, population: &[Individual], parallel: bool) -> Vec<f64> {
    if parallel {
        population
            .par_iter()
            .map(|individual| evaluator.fitness(individual))
            .collect()
    } else {
        population
            .iter()
            .map(|individual| evaluator.fitness(individual))
            .collect()
    }
}

/// Elites first, then offspring of selected parents.
fn next_generation<R: Rng>(
    population: &[Individual],
    fitness: &[f64],
    config: &OptimizerConfig,
    rng: &mut R,
) -> Vec<Individual> {
    let size = population.len();
    let mut ranked: Vec<usize> = (0..size).collect();
    ranked.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));

    let elite_count = ((size as f64 * config.elite_fraction).round() as usize).min(size);
    let mut next: Vec<Individual> = ranked[..elite_count]
        .iter()
        .map(|&i| population[i].clone())
        .collect();

    while next.len() < size {
        let mother = &population[select_parent(fitness, config.parent_selection, rng)];
        let father = &population[select_parent(fitness, config.parent_selection, rng)];
        let mut child = crossover(mother, father, rng);
        mutate(&mut child, config.mutation_rate, rng);
        next.push(child);
    }
    next
}

fn select_parent<R: Rng>(fitness: &[f64], selection: ParentSelection, rng: &mut R) -> usize {
    match selection {
        ParentSelection::Uniform => rng.gen_range(0..fitness.len()),
        ParentSelection::Tournament { size } => {
            let mut best = rng.gen_range(0..fitness.len());
            for _ in 1..size {
                let challenger = rng.gen_range(0..fitness.len());
                if fitness[challenger] > fitness[best] {
                    best = challenger;
                }
            }
            best
        }
    }
}

/// Single-point crossover; the cut is never at either end.
fn crossover<R: Rng>(mother: &[bool], father: &[bool], rng: &mut R) -> Individual {
    if mother.len() < 2 {
        return mother.to_vec();
    }
    let cut = rng.gen_range(1..mother.len());
    mother[..cut].iter().chain(&father[cut..]).copied().collect()
}

fn mutate<R: Rng>(individual: &mut [bool], rate: f64, rng: &mut R) {
    for gene in individual.iter_mut() {
        if rng.gen_bool(rate) {
            *gene = !*gene;
        }
    }
}
