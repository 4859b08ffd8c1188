//! Subcommand implementations

pub mod levels;
pub mod overlay;
pub mod project;
pub mod validate;

use anyhow::Result;
use grid_estimator::Config;
use std::path::Path;
use tracing::info;

/// Load the config file if one was given, otherwise defaults plus env overrides
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let config = Config::from_file(path)?;
            info!("Loaded configuration from: {}", path.display());
            Ok(config)
        }
        None => Config::from_env(),
    }
}
