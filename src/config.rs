//! Configuration management
//!
//! Handles loading and parsing of JSON configuration files with environment
//! variable overrides. Every section is optional; a missing file section
//! falls back to the documented defaults.

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::grid::MIN_GRID_LINES;
use crate::projection::DEFAULT_DAILY_GRID_CROSSINGS;
use crate::GridType;

/// Env var overriding `projection.assumed_daily_grid_crossings`
pub const CROSSINGS_ENV_VAR: &str = "GRID_ASSUMED_DAILY_CROSSINGS";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub validation: ValidationLimits,
    #[serde(default)]
    pub chart: ChartConfig,
}

impl Config {
    /// Load configuration from JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file {}", path.as_ref().display())
        })?;
        let mut config = Self::from_json(&contents)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON string without env overrides
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse config JSON")
    }

    /// Defaults plus env overrides, for when no config file is given
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var(CROSSINGS_ENV_VAR) {
            let crossings: Decimal = raw
                .trim()
                .parse()
                .with_context(|| format!("{} is not a decimal: {:?}", CROSSINGS_ENV_VAR, raw))?;
            debug!(%crossings, "Daily grid crossings overridden from environment");
            self.projection.assumed_daily_grid_crossings = crossings;
        }
        Ok(())
    }

    /// Reject limits that would make validation or estimation meaningless
    pub fn validate(&self) -> Result<()> {
        if self.projection.assumed_daily_grid_crossings < Decimal::ZERO {
            bail!("projection.assumed_daily_grid_crossings must not be negative");
        }

        let v = &self.validation;
        if v.min_grid_lines < MIN_GRID_LINES {
            bail!(
                "validation.min_grid_lines must be at least {}",
                MIN_GRID_LINES
            );
        }
        if v.min_grid_lines > v.max_grid_lines {
            bail!("validation.min_grid_lines exceeds validation.max_grid_lines");
        }
        if v.min_profit_per_grid <= 0.0 || v.min_profit_per_grid > v.max_profit_per_grid {
            bail!("validation profit per grid bounds must satisfy 0 < min <= max");
        }
        if v.min_investment <= 0.0 {
            bail!("validation.min_investment must be positive");
        }

        let c = &self.chart;
        if !(c.band_pct > 0.0 && c.band_pct < 1.0) {
            bail!("chart.band_pct must be between 0 and 1 (exclusive)");
        }
        if c.grid_lines < MIN_GRID_LINES {
            bail!("chart.grid_lines must be at least {}", MIN_GRID_LINES);
        }

        Ok(())
    }
}

/// Profit projection assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Completed grid cycles assumed per day (default: 1)
    #[serde(default = "default_crossings")]
    pub assumed_daily_grid_crossings: Decimal,
}

fn default_crossings() -> Decimal {
    DEFAULT_DAILY_GRID_CROSSINGS
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            assumed_daily_grid_crossings: default_crossings(),
        }
    }
}

/// Bounds enforced by the bot form validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    /// Minimum investment in quote currency (default: 10 USDT)
    pub min_investment: f64,
    /// Default: 5
    pub min_grid_lines: u32,
    /// Default: 100
    pub max_grid_lines: u32,
    /// Percent (default: 0.1)
    pub min_profit_per_grid: f64,
    /// Percent (default: 2)
    pub max_profit_per_grid: f64,
    /// Quote currency used in messages (default: "USDT")
    pub quote_currency: String,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            min_investment: 10.0,
            min_grid_lines: 5,
            max_grid_lines: 100,
            min_profit_per_grid: 0.1,
            max_profit_per_grid: 2.0,
            quote_currency: "USDT".to_string(),
        }
    }
}

/// Chart overlay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Half-width of the suggested range around the last price (0.10 = ±10%)
    pub band_pct: f64,
    /// Number of overlay lines (default: 10)
    pub grid_lines: u32,
    /// Default: arithmetic
    pub grid_type: GridType,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            band_pct: 0.10,
            grid_lines: 10,
            grid_type: GridType::Arithmetic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.projection.assumed_daily_grid_crossings, dec!(1));
        assert_eq!(config.validation.min_grid_lines, 5);
        assert_eq!(config.chart.grid_type, GridType::Arithmetic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_json(
            r#"{
                "projection": { "assumed_daily_grid_crossings": 2.5 },
                "validation": { "max_grid_lines": 150 },
                "chart": { "grid_type": "geometric" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.projection.assumed_daily_grid_crossings, dec!(2.5));
        assert_eq!(config.validation.max_grid_lines, 150);
        assert_eq!(config.validation.min_grid_lines, 5);
        assert_eq!(config.chart.grid_type, GridType::Geometric);
        assert_eq!(config.chart.grid_lines, 10);
    }

    #[test]
    fn test_crossings_accepts_string() {
        let config =
            Config::from_json(r#"{ "projection": { "assumed_daily_grid_crossings": "0.75" } }"#)
                .unwrap();
        assert_eq!(config.projection.assumed_daily_grid_crossings, dec!(0.75));
    }

    #[test]
    fn test_validate_rejects_bad_limits() {
        let mut config = Config::default();
        config.validation.min_grid_lines = 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.validation.min_grid_lines = 200;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.validation.min_profit_per_grid = 3.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.chart.band_pct = 1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.projection.assumed_daily_grid_crossings = dec!(-1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config JSON"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file("/nonexistent/grid.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
