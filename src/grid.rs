//! Grid level calculation
//!
//! Divides a price range into `grid_lines` ordered levels. The first level is
//! always exactly `lower_price` and the last exactly `upper_price`; interior
//! levels are computed directly from their index rather than accumulated, so
//! rounding error does not build up along the grid.

use itertools::Itertools;
use serde::Serialize;
use std::cmp::Ordering;

use crate::error::{GridResult, RangeViolation};
use crate::{GridConfiguration, GridType};

/// Smallest grid the math supports (one interval)
pub const MIN_GRID_LINES: u32 = 2;

/// Check that a range can be divided into `grid_lines` levels of the given type.
pub fn check_range(
    lower_price: f64,
    upper_price: f64,
    grid_lines: u32,
    grid_type: GridType,
) -> GridResult<()> {
    if !lower_price.is_finite() || !upper_price.is_finite() {
        return Err(RangeViolation::NonFinite {
            lower: lower_price,
            upper: upper_price,
        }
        .into());
    }

    if grid_lines < MIN_GRID_LINES {
        return Err(RangeViolation::TooFewLines(grid_lines).into());
    }

    if upper_price.partial_cmp(&lower_price) != Some(Ordering::Greater) {
        return Err(RangeViolation::NotAscending {
            lower: lower_price,
            upper: upper_price,
        }
        .into());
    }

    match grid_type {
        GridType::Geometric if lower_price <= 0.0 => {
            Err(RangeViolation::NonPositiveGeometricLower(lower_price).into())
        }
        GridType::Geometric if !(upper_price / lower_price).is_finite() => {
            Err(RangeViolation::RatioOverflow {
                lower: lower_price,
                upper: upper_price,
            }
            .into())
        }
        GridType::Arithmetic if lower_price < 0.0 => {
            Err(RangeViolation::NegativeLower(lower_price).into())
        }
        _ => Ok(()),
    }
}

/// Compute `grid_lines` strictly increasing price levels spanning
/// `[lower_price, upper_price]`.
///
/// - Arithmetic: `lower + i * (upper - lower) / (n - 1)`
/// - Geometric: `lower * (upper / lower) ^ (i / (n - 1))`
///
/// Returns `GridError::InvalidRange` when the range is inverted or empty,
/// fewer than two lines are requested, the lower price is not positive in
/// geometric mode, `upper / lower` overflows, or the range is too narrow
/// for the levels to stay distinct in floating point.
pub fn compute_grid_levels(
    lower_price: f64,
    upper_price: f64,
    grid_lines: u32,
    grid_type: GridType,
) -> GridResult<Vec<f64>> {
    check_range(lower_price, upper_price, grid_lines, grid_type)?;

    let last = (grid_lines - 1) as usize;
    let intervals = f64::from(grid_lines - 1);

    let mut levels: Vec<f64> = match grid_type {
        GridType::Arithmetic => {
            let step = (upper_price - lower_price) / intervals;
            (0..=last).map(|i| lower_price + step * i as f64).collect()
        }
        GridType::Geometric => {
            let total_ratio = upper_price / lower_price;
            (0..=last)
                .map(|i| lower_price * total_ratio.powf(i as f64 / intervals))
                .collect()
        }
    };

    // Pin the endpoints so callers can compare them exactly
    levels[0] = lower_price;
    levels[last] = upper_price;

    if levels.iter().tuple_windows().any(|(a, b)| b <= a) {
        return Err(RangeViolation::TooNarrow {
            lower: lower_price,
            upper: upper_price,
            lines: grid_lines,
        }
        .into());
    }

    Ok(levels)
}

/// Computed grid levels together with the spacing rule that produced them
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLevels {
    grid_type: GridType,
    prices: Vec<f64>,
}

impl GridLevels {
    pub fn compute(
        lower_price: f64,
        upper_price: f64,
        grid_lines: u32,
        grid_type: GridType,
    ) -> GridResult<Self> {
        let prices = compute_grid_levels(lower_price, upper_price, grid_lines, grid_type)?;
        Ok(Self { grid_type, prices })
    }

    pub fn from_config(config: &GridConfiguration) -> GridResult<Self> {
        Self::compute(
            config.lower_price,
            config.upper_price,
            config.grid_lines,
            config.grid_type,
        )
    }

    pub fn grid_type(&self) -> GridType {
        self.grid_type
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Always false for a successfully computed grid
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn lower(&self) -> f64 {
        self.prices[0]
    }

    pub fn upper(&self) -> f64 {
        self.prices[self.prices.len() - 1]
    }

    /// Absolute price difference between each pair of adjacent levels
    pub fn steps(&self) -> Vec<f64> {
        self.prices
            .iter()
            .tuple_windows()
            .map(|(a, b)| b - a)
            .collect()
    }

    /// Ratio between each pair of adjacent levels
    pub fn ratios(&self) -> Vec<f64> {
        self.prices
            .iter()
            .tuple_windows()
            .map(|(a, b)| b / a)
            .collect()
    }

    /// Nominal spacing: the constant step for arithmetic grids, the constant
    /// ratio for geometric grids.
    pub fn spacing(&self) -> f64 {
        let intervals = (self.prices.len() - 1) as f64;
        match self.grid_type {
            GridType::Arithmetic => (self.upper() - self.lower()) / intervals,
            GridType::Geometric => (self.upper() / self.lower()).powf(1.0 / intervals),
        }
    }
}
