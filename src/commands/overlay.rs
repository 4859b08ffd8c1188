//! Overlay command implementation

use anyhow::Result;
use grid_estimator::chart::{load_candles_csv, overlay_price_lines, suggest_price_range};
use grid_estimator::{format, Config};
use std::path::PathBuf;
use tracing::{info, warn};

pub fn run(config: &Config, candles_path: PathBuf) -> Result<()> {
    let candles = load_candles_csv(&candles_path)?;

    let Some(last) = candles.last() else {
        warn!("No candles in {}", candles_path.display());
        return Ok(());
    };

    let chart = &config.chart;
    if let Some((lower, upper)) = suggest_price_range(last.close, chart.band_pct) {
        println!(
            "Last close {} -> suggested range {} - {}",
            format::price(last.close),
            format::price(lower),
            format::price(upper)
        );
    }

    let lines = overlay_price_lines(&candles, chart)?;
    info!(
        "{} {} lines around last close",
        lines.len(),
        chart.grid_type
    );
    for line in lines {
        println!("{:<10} {:>16}", line.title, format::price(line.price));
    }

    Ok(())
}
