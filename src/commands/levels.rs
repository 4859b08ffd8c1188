//! Levels command implementation

use anyhow::Result;
use grid_estimator::chart::{price_lines, write_levels_csv};
use grid_estimator::grid::GridLevels;
use grid_estimator::{format, GridType};
use std::path::PathBuf;
use tracing::info;

pub fn run(
    lower: f64,
    upper: f64,
    lines: u32,
    grid_type: GridType,
    output: Option<PathBuf>,
) -> Result<()> {
    info!(lower, upper, lines, %grid_type, "Computing grid levels");

    let levels = GridLevels::compute(lower, upper, lines, grid_type)?;

    println!("{:<10} {:>16}", "Line", "Price");
    for line in price_lines(&levels) {
        println!("{:<10} {:>16}", line.title, format::price(line.price));
    }
    match grid_type {
        GridType::Arithmetic => println!("Step: {}", format::price(levels.spacing())),
        GridType::Geometric => println!(
            "Ratio: {:.6} ({:.4}% per line)",
            levels.spacing(),
            (levels.spacing() - 1.0) * 100.0
        ),
    }

    if let Some(path) = output {
        write_levels_csv(&path, &levels)?;
    }

    Ok(())
}
