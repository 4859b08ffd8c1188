//! Validate command implementation

use anyhow::{Context, Result};
use grid_estimator::dashboard::ApiKey;
use grid_estimator::validation::RawBotInput;
use grid_estimator::{Config, GridEstimator};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Parse comma-separated key ids
fn parse_keys(s: &str) -> Result<Vec<ApiKey>> {
    s.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            let id: i64 = id
                .parse()
                .with_context(|| format!("Invalid API key id: {}", id))?;
            Ok(ApiKey {
                id,
                name: format!("key-{}", id),
            })
        })
        .collect()
}

pub fn run(config: &Config, input: PathBuf, keys: &str) -> Result<()> {
    let keys = parse_keys(keys)?;
    let contents = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let raw: RawBotInput =
        serde_json::from_str(&contents).context("Failed to parse form JSON")?;

    info!("Validating {} against {} API keys", input.display(), keys.len());

    let estimator = GridEstimator::from_config(config)?;
    let preview = estimator.preview(&raw, &keys);

    match preview.estimate.projection() {
        Some(projection) => {
            println!("Daily Profit (Est.):   {}", projection.daily_label());
            println!("Monthly Profit (Est.): {}", projection.monthly_label());
        }
        None => println!("Estimated performance unavailable"),
    }

    match preview.validation {
        Ok(request) => {
            println!("{}", serde_json::to_string_pretty(&request)?);
            Ok(())
        }
        Err(errors) => {
            for error in &errors {
                warn!(field = %error.field, "{}", error.message);
                println!("{}", error);
            }
            anyhow::bail!("{} field(s) failed validation", errors.len())
        }
    }
}
