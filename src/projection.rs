//! Profit projection
//!
//! Projects daily and monthly profit for a grid configuration:
//!
//! ```text
//! daily_profit   = investment * (profit_per_grid / 100) * assumed_daily_grid_crossings
//! monthly_profit = daily_profit * 30
//! *_percentage   = profit / investment * 100
//! ```
//!
//! All arithmetic is exact decimal; rounding is left to the presentation
//! layer (`crate::format`), so the monthly figure is always exactly thirty
//! times the daily one.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::debug;

use crate::config::ProjectionConfig;
use crate::error::{ConfigViolation, GridResult};
use crate::format;
use crate::grid::check_range;
use crate::{GridConfiguration, Money};

/// Days in a projected month
pub const DAYS_PER_MONTH: u32 = 30;

/// Completed grid cycles assumed per day when nothing else is configured.
///
/// This is a market assumption, not a property of the grid: one full
/// buy/sell cycle at adjacent lines per day.
pub const DEFAULT_DAILY_GRID_CROSSINGS: Decimal = Decimal::ONE;

/// Projected profit, unrounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitProjection {
    pub daily_profit: Money,
    pub monthly_profit: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub daily_profit_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_profit_percentage: Decimal,
}

impl ProfitProjection {
    /// Projection shown when the grid itself is degenerate
    pub const ZERO: ProfitProjection = ProfitProjection {
        daily_profit: Money::ZERO,
        monthly_profit: Money::ZERO,
        daily_profit_percentage: Decimal::ZERO,
        monthly_profit_percentage: Decimal::ZERO,
    };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// "$0.53 (0.53%)"
    pub fn daily_label(&self) -> String {
        format::amount_with_percent(self.daily_profit, self.daily_profit_percentage)
    }

    /// "$15.90 (15.90%)"
    pub fn monthly_label(&self) -> String {
        format::amount_with_percent(self.monthly_profit, self.monthly_profit_percentage)
    }
}

/// Profit projector parameterised by the assumed grid crossing frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfitProjector {
    assumed_daily_grid_crossings: Decimal,
}

impl Default for ProfitProjector {
    fn default() -> Self {
        Self {
            assumed_daily_grid_crossings: DEFAULT_DAILY_GRID_CROSSINGS,
        }
    }
}

impl ProfitProjector {
    /// Create a projector assuming `crossings` completed grid cycles per day
    pub fn new(crossings: Decimal) -> GridResult<Self> {
        if crossings.is_sign_negative() && !crossings.is_zero() {
            return Err(ConfigViolation::NegativeCrossings(crossings).into());
        }
        Ok(Self {
            assumed_daily_grid_crossings: crossings,
        })
    }

    pub fn from_config(config: &ProjectionConfig) -> GridResult<Self> {
        Self::new(config.assumed_daily_grid_crossings)
    }

    pub fn assumed_daily_grid_crossings(&self) -> Decimal {
        self.assumed_daily_grid_crossings
    }

    /// Project profit for a configuration.
    ///
    /// Fails with `GridError::InvalidConfiguration` when the investment or the
    /// profit rate is not positive. A degenerate grid (inverted range, too
    /// few lines, non-positive geometric lower bound) is not an error here:
    /// the projection is zero so previews never show NaN.
    pub fn project(&self, config: &GridConfiguration) -> GridResult<ProfitProjection> {
        let investment = config.investment_amount.inner();
        if investment <= Decimal::ZERO {
            return Err(ConfigViolation::NonPositiveInvestment(investment).into());
        }
        if config.profit_per_grid <= Decimal::ZERO {
            return Err(ConfigViolation::NonPositiveProfitRate(config.profit_per_grid).into());
        }

        if let Err(err) = check_range(
            config.lower_price,
            config.upper_price,
            config.grid_lines,
            config.grid_type,
        ) {
            debug!(error = %err, "Degenerate grid, projecting zero profit");
            return Ok(ProfitProjection::ZERO);
        }

        let rate = config.profit_per_grid / dec!(100);
        let daily = investment
            .checked_mul(rate)
            .and_then(|v| v.checked_mul(self.assumed_daily_grid_crossings))
            .ok_or(ConfigViolation::Overflow)?;
        let monthly = daily
            .checked_mul(Decimal::from(DAYS_PER_MONTH))
            .ok_or(ConfigViolation::Overflow)?;

        Ok(ProfitProjection {
            daily_profit: Money::new(daily),
            monthly_profit: Money::new(monthly),
            daily_profit_percentage: percentage_of(daily, investment)?,
            monthly_profit_percentage: percentage_of(monthly, investment)?,
        })
    }
}

fn percentage_of(amount: Decimal, base: Decimal) -> GridResult<Decimal> {
    amount
        .checked_div(base)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or_else(|| ConfigViolation::Overflow.into())
}

/// Project profit with the default crossing assumption
pub fn project_profit(config: &GridConfiguration) -> GridResult<ProfitProjection> {
    ProfitProjector::default().project(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;
    use crate::GridType;

    fn config(investment: Decimal, profit_per_grid: Decimal) -> GridConfiguration {
        GridConfiguration {
            lower_price: 100.0,
            upper_price: 200.0,
            grid_lines: 20,
            grid_type: GridType::Geometric,
            profit_per_grid,
            investment_amount: Money::new(investment),
        }
    }

    #[test]
    fn test_reference_scenario() {
        let projection = project_profit(&config(dec!(100), dec!(0.53))).unwrap();
        assert_eq!(projection.daily_profit, Money::new(dec!(0.53)));
        assert_eq!(projection.monthly_profit, Money::new(dec!(15.90)));
        assert_eq!(projection.daily_profit_percentage, dec!(0.53));
        assert_eq!(projection.monthly_profit_percentage, dec!(15.90));
        assert_eq!(projection.daily_label(), "$0.53 (0.53%)");
        assert_eq!(projection.monthly_label(), "$15.90 (15.90%)");
    }

    #[test]
    fn test_linear_in_investment() {
        for (investment, rate) in [
            (dec!(10), dec!(0.1)),
            (dec!(123.45), dec!(0.53)),
            (dec!(9999.99), dec!(1.37)),
            (dec!(3), dec!(2)),
        ] {
            let single = project_profit(&config(investment, rate)).unwrap();
            let double = project_profit(&config(investment * dec!(2), rate)).unwrap();
            assert_eq!(double.daily_profit, single.daily_profit * dec!(2));
            assert_eq!(double.monthly_profit, single.monthly_profit * dec!(2));
            assert_eq!(double.daily_profit_percentage, single.daily_profit_percentage);
        }
    }

    #[test]
    fn test_monthly_is_thirty_days() {
        let projector = ProfitProjector::new(dec!(2.75)).unwrap();
        for rate in [dec!(0.1), dec!(0.33), dec!(1.999)] {
            let p = projector.project(&config(dec!(777.77), rate)).unwrap();
            assert_eq!(p.monthly_profit, p.daily_profit * dec!(30));
        }
    }

    #[test]
    fn test_crossings_scale_profit() {
        let projector = ProfitProjector::new(dec!(3)).unwrap();
        let p = projector.project(&config(dec!(100), dec!(0.5))).unwrap();
        assert_eq!(p.daily_profit, Money::new(dec!(1.5)));
        assert_eq!(p.daily_profit_percentage, dec!(1.5));
    }

    #[test]
    fn test_zero_crossings_project_zero() {
        let projector = ProfitProjector::new(Decimal::ZERO).unwrap();
        let p = projector.project(&config(dec!(100), dec!(0.5))).unwrap();
        assert!(p.is_zero());
    }

    #[test]
    fn test_negative_crossings_rejected() {
        let err = ProfitProjector::new(dec!(-1)).unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidConfiguration(ConfigViolation::NegativeCrossings(dec!(-1)))
        );
    }

    #[test]
    fn test_non_positive_investment_is_error() {
        for investment in [dec!(0), dec!(-50)] {
            let err = project_profit(&config(investment, dec!(0.5))).unwrap_err();
            assert!(matches!(
                err,
                GridError::InvalidConfiguration(ConfigViolation::NonPositiveInvestment(_))
            ));
        }
    }

    #[test]
    fn test_non_positive_profit_rate_is_error() {
        let err = project_profit(&config(dec!(100), dec!(0))).unwrap_err();
        assert!(matches!(
            err,
            GridError::InvalidConfiguration(ConfigViolation::NonPositiveProfitRate(_))
        ));
    }

    #[test]
    fn test_degenerate_grid_projects_zero() {
        let mut cfg = config(dec!(100), dec!(0.5));
        cfg.upper_price = cfg.lower_price;
        assert!(project_profit(&cfg).unwrap().is_zero());

        let mut cfg = config(dec!(100), dec!(0.5));
        cfg.grid_lines = 1;
        assert!(project_profit(&cfg).unwrap().is_zero());

        let mut cfg = config(dec!(100), dec!(0.5));
        cfg.lower_price = 0.0;
        assert!(project_profit(&cfg).unwrap().is_zero());

        // Same range is fine for an arithmetic grid
        cfg.grid_type = GridType::Arithmetic;
        assert!(!project_profit(&cfg).unwrap().is_zero());
    }

    #[test]
    fn test_overflow_is_reported() {
        let projector = ProfitProjector::new(Decimal::MAX).unwrap();
        let err = projector
            .project(&config(Decimal::MAX, dec!(2)))
            .unwrap_err();
        assert_eq!(err, GridError::InvalidConfiguration(ConfigViolation::Overflow));
    }
}
