//! Price chart support
//!
//! Seeds a default price range from the latest price, produces labelled grid
//! lines for overlay on a candle chart, and moves candles and levels in and
//! out of CSV files. Drawing the chart is left to the host.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use crate::config::ChartConfig;
use crate::error::GridResult;
use crate::grid::GridLevels;
use crate::Candle;

/// Suggested `(lower, upper)` range of `band_pct` either side of `price`.
///
/// Returns `None` for a non-positive or non-finite price, or a band outside
/// `(0, 1)`.
pub fn suggest_price_range(price: f64, band_pct: f64) -> Option<(f64, f64)> {
    if !price.is_finite() || price <= 0.0 || !(band_pct > 0.0 && band_pct < 1.0) {
        return None;
    }
    Some((price * (1.0 - band_pct), price * (1.0 + band_pct)))
}

/// One horizontal line drawn over the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceLine {
    pub price: f64,
    pub title: String,
}

/// Label grid levels bottom-up as "Grid 1", "Grid 2", ...
pub fn price_lines(levels: &GridLevels) -> Vec<PriceLine> {
    levels
        .prices()
        .iter()
        .enumerate()
        .map(|(i, &price)| PriceLine {
            price,
            title: format!("Grid {}", i + 1),
        })
        .collect()
}

/// Grid lines around the last close of a candle series.
///
/// An empty series produces no lines.
pub fn overlay_price_lines(candles: &[Candle], chart: &ChartConfig) -> GridResult<Vec<PriceLine>> {
    let Some(last) = candles.last() else {
        return Ok(Vec::new());
    };

    let Some((lower, upper)) = suggest_price_range(last.close, chart.band_pct) else {
        debug!(close = last.close, "Last close cannot seed a grid range");
        return Ok(Vec::new());
    };

    let levels = GridLevels::compute(lower, upper, chart.grid_lines, chart.grid_type)?;
    Ok(price_lines(&levels))
}

/// Load OHLCV candles from a CSV file.
///
/// Expected columns: datetime, open, high, low, close, volume. The datetime
/// may be RFC 3339, `%Y-%m-%d %H:%M:%S` (UTC), or epoch milliseconds.
pub fn load_candles_csv(path: impl AsRef<Path>) -> Result<Vec<Candle>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file {}", path.display()))?;

    let mut candles = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        let record = result.with_context(|| format!("Failed to read row {}", row))?;

        let dt_str = record.get(0).context("Missing datetime column")?;
        let datetime = parse_datetime(dt_str)
            .with_context(|| format!("Failed to parse datetime on row {}: {}", row, dt_str))?;

        let column = |idx: usize, name: &str| -> Result<f64> {
            record
                .get(idx)
                .with_context(|| format!("Missing {} column on row {}", name, row))?
                .trim()
                .parse()
                .with_context(|| format!("Failed to parse {} on row {}", name, row))
        };

        let candle = Candle {
            datetime,
            open: column(1, "open")?,
            high: column(2, "high")?,
            low: column(3, "low")?,
            close: column(4, "close")?,
            volume: column(5, "volume")?,
        };
        candle
            .validate()
            .with_context(|| format!("Invalid candle on row {}", row))?;

        candles.push(candle);
    }

    info!("Loaded {} candles from {}", candles.len(), path.display());
    Ok(candles)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = s.parse::<DateTime<Utc>>() {
        return Some(dt);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc));
    }
    s.parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

/// Write grid levels as `index,title,price` rows
pub fn write_levels_csv(path: impl AsRef<Path>, levels: &GridLevels) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;

    writer.write_record(["index", "title", "price"])?;
    for (i, line) in price_lines(levels).iter().enumerate() {
        writer.write_record([(i + 1).to_string(), line.title.clone(), line.price.to_string()])?;
    }
    writer.flush().context("Failed to flush levels CSV")?;

    info!("Wrote {} levels to {}", levels.len(), path.display());
    Ok(())
}
