//! End-to-end run: radiation, candidate sizing and optimization.

use std::fs;
use std::path::Path;

use bipv_model::{BuildingElement, CandidateInstallation, Project, TechnologyParameters, WeatherSeries};
use serde::Serialize;
use tracing::{info, warn};

use crate::cancel::CancellationFlag;
use crate::candidate::build_candidates;
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::optimizer::{OptimizationOutcome, optimize_with};
use crate::radiation::{RadiationResult, calculate_annual_radiation_with};
use crate::weather::synthetic_year;

#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub project: Project,
    pub elements: Vec<BuildingElement>,
    pub radiation: RadiationResult,
    pub technology: TechnologyParameters,
    pub candidates: Vec<CandidateInstallation>,
    /// `None` when radiation only was requested
    pub optimization: Option<OptimizationOutcome>,
}

/// A small office facade: two windows per orientation plus two elements
/// without a surveyed azimuth.
pub fn demo_elements() -> Vec<BuildingElement> {
    let mut elements: Vec<BuildingElement> = bipv_model::Orientation::ALL
        .iter()
        .enumerate()
        .flat_map(|(i, orientation)| {
            let azimuth = orientation.nominal_azimuth();
            [
                BuildingElement::new(format!("{}-1", orientation.code()), 6.0 + i as f64, Some(azimuth)),
                BuildingElement::new(format!("{}-2", orientation.code()), 3.5, Some((azimuth + 10.0) % 360.0)),
            ]
        })
        .collect();
    elements.push(BuildingElement::new("stair-core", 8.0, None));
    elements.push(BuildingElement::new("lobby", 12.0, None));
    elements
}

/// Configured elements (or the demo set) with suitability applied.
pub fn prepare_elements(config: &AppConfig) -> Result<Vec<BuildingElement>> {
    let mut elements = if config.elements.is_empty() {
        info!("no elements configured, using demo facade");
        demo_elements()
    } else {
        config.building_elements()?
    };
    let suitable = config.suitability.apply(&mut elements);
    info!(elements = elements.len(), suitable, "elements prepared");
    Ok(elements)
}

/// Synthetic weather year for the project site.
pub fn project_weather(project: &Project) -> Result<WeatherSeries> {
    let coordinates = project.coordinates.ok_or(Error::MissingCoordinates)?;
    Ok(synthetic_year(&coordinates))
}

/// Run the configured pipeline. With `optimize` unset only the radiation
/// analysis and candidate sizing are performed.
pub fn run(
    config: &AppConfig,
    weather: &WeatherSeries,
    optimize: bool,
    cancel: &CancellationFlag,
) -> Result<PipelineReport> {
    let elements = prepare_elements(config)?;
    let technology = config.technology.resolve()?;

    let radiation = calculate_annual_radiation_with(
        &config.project,
        weather,
        &elements,
        &config.radiation,
        cancel,
        |progress| {
            tracing::debug!(completed = progress.completed, total = progress.total, "radiation progress");
        },
    )?;
    for warning in &radiation.warnings {
        warn!(?warning, "radiation degraded");
    }

    let candidates = build_candidates(&elements, &radiation, &technology)?;

    let optimization = if optimize {
        let outcome = optimize_with(&candidates, &config.optimizer, cancel, |progress| {
            tracing::debug!(
                generation = progress.generation,
                best_fitness = progress.best_fitness,
                "generation progress"
            );
        })?;
        Some(outcome)
    } else {
        None
    };

    Ok(PipelineReport {
        project: config.project.clone(),
        elements,
        radiation,
        technology,
        candidates,
        optimization,
    })
}

pub fn print_summary(report: &PipelineReport) {
    println!("\n=== BIPV ANALYSIS: {} ===", report.project.display());
    println!(
        "Radiation: {} elements, {} precision, {} ms",
        report.radiation.len(),
        report.radiation.precision,
        report.radiation.compute_time.as_millis()
    );
    for (orientation, mean) in report.radiation.mean_by_orientation(&report.elements) {
        println!("  {:<3} {:>7.1} kWh/m²/year", orientation.code(), mean);
    }
    if !report.radiation.warnings.is_empty() {
        println!("  {} warning(s)", report.radiation.warnings.len());
    }
    println!("Technology: {}", report.technology.name);
    println!("Candidates: {}", report.candidates.len());

    if let Some(outcome) = &report.optimization {
        println!(
            "\nOptimization: {} generations, {} evaluations, {} ms",
            outcome.generations_run,
            outcome.evaluations,
            outcome.compute_time.as_millis()
        );
        for solution in &outcome.solutions {
            println!(
                "  #{:<2} {:>2} elements  {:>6.2} kW  cost {:>9.0}  {:>8.0} kWh/yr  ROI {:>5.1}%  payback {}",
                solution.rank,
                solution.selected_count(),
                solution.capacity_kw,
                solution.cost,
                solution.annual_energy_kwh,
                solution.roi_percent,
                solution
                    .payback_years
                    .map(|years| format!("{:.1} y", years))
                    .unwrap_or_else(|| "-".to_string()),
            );
        }
    }
    println!("=====================================\n");
}

/// Write the report as pretty-printed JSON.
pub fn write_report(report: &PipelineReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    info!(path = %path.display(), "results written");
    Ok(())
}
