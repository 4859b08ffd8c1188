//! Grid Estimator
//!
//! Parameter and performance estimation for grid trading bots: price levels
//! for arithmetic and geometric grids, daily/monthly profit projections, and
//! validation of the bot creation form.
//!
//! Everything here is pure and synchronous. Nothing performs I/O except the
//! CSV and config helpers, so estimates are safe to recompute on every edit
//! from any thread.
//!
//! ## Example
//! ```
//! use grid_estimator::grid::compute_grid_levels;
//! use grid_estimator::projection::project_profit;
//! use grid_estimator::{GridConfiguration, GridType, Money};
//! use rust_decimal_macros::dec;
//!
//! let levels = compute_grid_levels(100.0, 200.0, 5, GridType::Arithmetic).unwrap();
//! assert_eq!(levels, vec![100.0, 125.0, 150.0, 175.0, 200.0]);
//!
//! let config = GridConfiguration {
//!     lower_price: 100.0,
//!     upper_price: 200.0,
//!     grid_lines: 5,
//!     grid_type: GridType::Arithmetic,
//!     profit_per_grid: dec!(0.53),
//!     investment_amount: Money::new(dec!(100)),
//! };
//! let projection = project_profit(&config).unwrap();
//! assert_eq!(projection.monthly_label(), "$15.90 (15.90%)");
//! ```

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod estimator;
pub mod format;
pub mod grid;
pub mod projection;
pub mod types;
pub mod validation;

pub use config::Config;
pub use error::{GridError, GridResult};
pub use estimator::{Estimate, GridEstimator};
pub use types::*;
