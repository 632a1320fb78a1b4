//! SVG diagnostics for a run.

use std::path::Path;

use bipv_model::Orientation;
use indexmap::IndexMap;
use plotters::prelude::*;
use tracing::info;

use crate::error::{Error, Result};

type PlotResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// Bar chart of mean annual radiation per orientation.
pub fn plot_orientation_radiation(means: &IndexMap<Orientation, f64>, path: &Path) -> Result<()> {
    let mut bars: Vec<(Orientation, f64)> = means.iter().map(|(o, v)| (*o, *v)).collect();
    bars.sort_by_key(|(orientation, _)| Orientation::ALL.iter().position(|o| o == orientation));

    draw_orientation_bars(&bars, path).map_err(|e| Error::Plot(e.to_string()))?;
    info!(path = %path.display(), "orientation plot saved");
    Ok(())
}

fn draw_orientation_bars(bars: &[(Orientation, f64)], path: &Path) -> PlotResult {
    let root = SVGBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max).max(1.0) * 1.1;
    let mut chart = ChartBuilder::on(&root)
        .caption("Mean annual radiation by orientation", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..bars.len() as f64 - 0.5, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(bars.len().max(1))
        .x_label_formatter(&|x| {
            let index = x.round();
            if index >= 0.0 {
                bars.get(index as usize).map(|(o, _)| o.code().to_string()).unwrap_or_default()
            } else {
                String::new()
            }
        })
        .x_desc("Orientation")
        .y_desc("kWh/m²/year")
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
        Rectangle::new([(i as f64 - 0.3, 0.0), (i as f64 + 0.3, *value)], BLUE.filled())
    }))?;

    root.present()?;
    Ok(())
}

/// Line chart of the best fitness per generation.
pub fn plot_fitness_history(history: &[f64], path: &Path) -> Result<()> {
    if history.is_empty() {
        return Err(Error::Plot("no generations to plot".to_string()));
    }
    draw_fitness_line(history, path).map_err(|e| Error::Plot(e.to_string()))?;
    info!(path = %path.display(), "convergence plot saved");
    Ok(())
}

fn draw_fitness_line(history: &[f64], path: &Path) -> PlotResult {
    let root = SVGBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = history.iter().copied().fold(0.0, f64::max).max(1e-3) * 1.1;
    let mut chart = ChartBuilder::on(&root)
        .caption("Best fitness per generation", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..(history.len().max(2) - 1) as f64, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Generation")
        .y_desc("Fitness")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            history.iter().enumerate().map(|(i, &y)| (i as f64, y)),
            &RED,
        ))?
        .label("Best fitness")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}
