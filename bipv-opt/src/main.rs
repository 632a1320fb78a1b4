use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bipv_opt::config::{AppConfig, DEFAULT_CONFIG_PATH};
use bipv_opt::pipeline::{PipelineReport, print_summary, project_weather, run, write_report};
use bipv_opt::plot::{plot_fitness_history, plot_orientation_radiation};
use bipv_opt::telemetry::init_tracing;
use bipv_opt::CancellationFlag;
use tracing::{error, info};

fn main() {
    init_tracing();
    if let Err(e) = run_cli() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let (optimize, config_arg) = match args.get(1).map(|s| s.as_str()) {
        Some("radiation") => (false, args.get(2)),
        Some("run") => (true, args.get(2)),
        Some(_) => (true, args.get(1)),
        None => (true, None),
    };
    let config_path = config_arg
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = AppConfig::load_from(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    info!(project = %config.project.display(), optimize, "configuration loaded");

    let weather = project_weather(&config.project)?;
    let report = run(&config, &weather, optimize, &CancellationFlag::new())?;
    print_summary(&report);
    write_outputs(&config, &report)?;
    Ok(())
}

fn write_outputs(config: &AppConfig, report: &PipelineReport) -> Result<()> {
    let output = &config.output;
    fs::create_dir_all(&output.directory)
        .with_context(|| format!("Failed to create output directory {}", output.directory.display()))?;

    if output.write_json {
        let path = output.directory.join("results.json");
        write_report(report, &path).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if output.write_plots {
        write_plots(&output.directory, report);
    }
    Ok(())
}

/// Plot failures are reported but never fail the run.
fn write_plots(directory: &Path, report: &PipelineReport) {
    let means = report.radiation.mean_by_orientation(&report.elements);
    if let Err(e) = plot_orientation_radiation(&means, &directory.join("orientation_radiation.svg")) {
        println!("Warning: Failed to create plot: {}", e);
    }
    if let Some(outcome) = &report.optimization {
        if let Err(e) = plot_fitness_history(&outcome.best_fitness_history, &directory.join("fitness_convergence.svg")) {
            println!("Warning: Failed to create plot: {}", e);
        }
    }
}
