//! Live estimation facade
//!
//! Ties validation, grid levels and profit projection together for a form
//! that re-estimates on every edit. Each call is independent and holds no
//! state beyond its immutable settings, so one estimator can be shared
//! across threads.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::dashboard::{ApiKey, CreateBotRequest};
use crate::error::GridResult;
use crate::grid::GridLevels;
use crate::projection::{ProfitProjection, ProfitProjector};
use crate::validation::{FieldError, RawBotInput, Validator};
use crate::GridConfiguration;

/// Outcome of estimating a configuration for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Estimate {
    /// Projection is available. `levels` is `None` when the grid cannot be
    /// laid out, in which case the projection is zero.
    Ready {
        levels: Option<GridLevels>,
        projection: ProfitProjection,
    },
    /// Inputs cannot be projected; show a placeholder instead of figures
    CannotEstimate { reason: String },
}

impl Estimate {
    pub fn is_ready(&self) -> bool {
        matches!(self, Estimate::Ready { .. })
    }

    pub fn projection(&self) -> Option<&ProfitProjection> {
        match self {
            Estimate::Ready { projection, .. } => Some(projection),
            Estimate::CannotEstimate { .. } => None,
        }
    }

    pub fn levels(&self) -> Option<&GridLevels> {
        match self {
            Estimate::Ready { levels, .. } => levels.as_ref(),
            Estimate::CannotEstimate { .. } => None,
        }
    }
}

/// Validation result and live estimate for one form state
#[derive(Debug, Clone)]
pub struct Preview {
    pub validation: Result<CreateBotRequest, Vec<FieldError>>,
    pub estimate: Estimate,
}

impl Preview {
    pub fn errors(&self) -> &[FieldError] {
        match &self.validation {
            Ok(_) => &[],
            Err(errors) => errors,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GridEstimator {
    projector: ProfitProjector,
    validator: Validator,
}

impl GridEstimator {
    pub fn new(projector: ProfitProjector, validator: Validator) -> Self {
        Self {
            projector,
            validator,
        }
    }

    pub fn from_config(config: &Config) -> GridResult<Self> {
        Ok(Self::new(
            ProfitProjector::from_config(&config.projection)?,
            Validator::new(config.validation.clone()),
        ))
    }

    pub fn projector(&self) -> &ProfitProjector {
        &self.projector
    }

    pub fn validate(
        &self,
        raw: &RawBotInput,
        known_keys: &[ApiKey],
    ) -> Result<CreateBotRequest, Vec<FieldError>> {
        self.validator.validate(raw, known_keys)
    }

    /// Estimate levels and profit, degrading to `CannotEstimate` instead of
    /// failing.
    ///
    /// Grids with more lines than the validator allows are never laid out;
    /// like any other grid without usable levels they project zero.
    pub fn estimate(&self, config: &GridConfiguration) -> Estimate {
        let projection = match self.projector.project(config) {
            Ok(projection) => projection,
            Err(err) => {
                warn!(error = %err, "Cannot estimate grid profit");
                return Estimate::CannotEstimate {
                    reason: err.to_string(),
                };
            }
        };

        let max_lines = self.validator.limits().max_grid_lines;
        if config.grid_lines > max_lines {
            debug!(
                grid_lines = config.grid_lines,
                max_lines, "Too many grid lines to lay out, projecting zero profit"
            );
            return Estimate::Ready {
                levels: None,
                projection: ProfitProjection::ZERO,
            };
        }

        match GridLevels::from_config(config) {
            Ok(levels) => Estimate::Ready {
                levels: Some(levels),
                projection,
            },
            Err(err) => {
                debug!(error = %err, "No usable grid levels, projecting zero profit");
                Estimate::Ready {
                    levels: None,
                    projection: ProfitProjection::ZERO,
                }
            }
        }
    }

    /// Validate the form and estimate from whatever numbers it holds
    pub fn preview(&self, raw: &RawBotInput, known_keys: &[ApiKey]) -> Preview {
        let validation = self.validate(raw, known_keys);
        let estimate = match raw.preview_configuration() {
            Ok(config) => self.estimate(&config),
            Err(reason) => Estimate::CannotEstimate { reason },
        };
        Preview {
            validation,
            estimate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GridType, Money};
    use rust_decimal_macros::dec;

    fn config() -> GridConfiguration {
        GridConfiguration {
            lower_price: 100.0,
            upper_price: 200.0,
            grid_lines: 5,
            grid_type: GridType::Arithmetic,
            profit_per_grid: dec!(0.53),
            investment_amount: Money::new(dec!(100)),
        }
    }

    fn keys() -> Vec<ApiKey> {
        vec![ApiKey {
            id: 1,
            name: "main".to_string(),
        }]
    }

    #[test]
    fn test_estimate_ready() {
        let estimate = GridEstimator::default().estimate(&config());
        assert!(estimate.is_ready());
        assert_eq!(
            estimate.levels().unwrap().prices(),
            &[100.0, 125.0, 150.0, 175.0, 200.0]
        );
        assert_eq!(
            estimate.projection().unwrap().daily_profit,
            Money::new(dec!(0.53))
        );
    }

    #[test]
    fn test_degenerate_grid_is_ready_with_zero_projection() {
        let mut cfg = config();
        cfg.upper_price = 100.0;
        let estimate = GridEstimator::default().estimate(&cfg);
        assert!(estimate.is_ready());
        assert!(estimate.levels().is_none());
        assert!(estimate.projection().unwrap().is_zero());
    }

    #[test]
    fn test_range_too_narrow_for_lines_projects_zero() {
        let mut cfg = config();
        cfg.lower_price = 1e15;
        cfg.upper_price = 1e15 + 1.0;
        cfg.grid_lines = 100;
        let estimate = GridEstimator::default().estimate(&cfg);
        assert!(estimate.is_ready());
        assert!(estimate.levels().is_none());
        assert!(estimate.projection().unwrap().is_zero());
    }

    #[test]
    fn test_grid_lines_beyond_limit_are_not_laid_out() {
        let raw = RawBotInput {
            name: "huge".to_string(),
            api_key_id: 1.0,
            lower_price: 100.0,
            upper_price: 200.0,
            grid_lines: 1e12,
            ..Default::default()
        };
        let preview = GridEstimator::default().preview(&raw, &keys());
        assert_eq!(preview.errors().len(), 1);
        assert_eq!(preview.errors()[0].field, crate::validation::Field::GridLines);
        assert!(preview.estimate.is_ready());
        assert!(preview.estimate.levels().is_none());
        assert!(preview.estimate.projection().unwrap().is_zero());

        let mut cfg = config();
        cfg.grid_lines = 101;
        assert!(GridEstimator::default()
            .estimate(&cfg)
            .projection()
            .unwrap()
            .is_zero());
    }

    #[test]
    fn test_invalid_investment_cannot_estimate() {
        let mut cfg = config();
        cfg.investment_amount = Money::ZERO;
        let estimate = GridEstimator::default().estimate(&cfg);
        assert!(matches!(estimate, Estimate::CannotEstimate { .. }));
        assert!(estimate.projection().is_none());
    }

    #[test]
    fn test_preview_estimates_despite_field_errors() {
        let raw = RawBotInput {
            name: String::new(),
            api_key_id: 1.0,
            lower_price: 100.0,
            upper_price: 200.0,
            investment_amount: 5.0,
            ..Default::default()
        };
        let preview = GridEstimator::default().preview(&raw, &keys());
        assert_eq!(preview.errors().len(), 2);
        let projection = preview.estimate.projection().unwrap();
        // 5 * 0.53% * 1 crossing
        assert_eq!(projection.daily_profit, Money::new(dec!(0.0265)));
    }

    #[test]
    fn test_preview_of_blank_form() {
        let preview = GridEstimator::default().preview(&RawBotInput::default(), &keys());
        assert!(preview.validation.is_err());
        // Prices default to zero: degenerate grid, zero projection
        assert!(preview.estimate.projection().unwrap().is_zero());
    }

    #[test]
    fn test_from_config_uses_crossings() {
        let mut settings = Config::default();
        settings.projection.assumed_daily_grid_crossings = dec!(4);
        let estimator = GridEstimator::from_config(&settings).unwrap();
        let estimate = estimator.estimate(&config());
        assert_eq!(
            estimate.projection().unwrap().daily_profit,
            Money::new(dec!(2.12))
        );
    }
}
