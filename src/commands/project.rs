//! Project command implementation

use anyhow::Result;
use grid_estimator::projection::ProfitProjector;
use grid_estimator::validation::Validator;
use grid_estimator::{Config, Estimate, GridConfiguration, GridEstimator, GridType, Money};
use rust_decimal::Decimal;
use tracing::info;

#[allow(clippy::too_many_arguments)]
pub fn run(
    config: &Config,
    investment: Decimal,
    profit_per_grid: Decimal,
    lower: f64,
    upper: f64,
    lines: u32,
    grid_type: GridType,
    crossings_override: Option<Decimal>,
) -> Result<()> {
    let crossings =
        crossings_override.unwrap_or(config.projection.assumed_daily_grid_crossings);
    info!(%crossings, "Projecting profit");

    let projector = ProfitProjector::new(crossings)?;
    let estimator = GridEstimator::new(projector, Validator::new(config.validation.clone()));

    let grid = GridConfiguration {
        lower_price: lower,
        upper_price: upper,
        grid_lines: lines,
        grid_type,
        profit_per_grid,
        investment_amount: Money::new(investment),
    };

    let (levels, projection) = match estimator.estimate(&grid) {
        Estimate::Ready { levels, projection } => (levels, projection),
        Estimate::CannotEstimate { reason } => anyhow::bail!("Cannot estimate: {}", reason),
    };

    if levels.is_none() {
        println!("Grid levels cannot be laid out; projection is zero");
    }
    println!("Daily Profit (Est.):   {}", projection.daily_label());
    println!("Monthly Profit (Est.): {}", projection.monthly_label());
    println!("Assumed grid crossings per day: {}", crossings);

    Ok(())
}
