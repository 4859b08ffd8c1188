//! Estimator error types
//!
//! Both variants are local, recoverable conditions: callers either reject
//! the configuration before estimating or degrade to a "cannot estimate"
//! display state.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failure of a grid computation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Grid spacing is undefined for the requested range
    #[error("invalid grid range: {0}")]
    InvalidRange(RangeViolation),

    /// Investment or profit rate cannot produce a projection
    #[error("invalid grid configuration: {0}")]
    InvalidConfiguration(ConfigViolation),
}

/// Why a price range cannot be divided into grid lines
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeViolation {
    #[error("prices must be finite (lower={lower}, upper={upper})")]
    NonFinite { lower: f64, upper: f64 },

    #[error("upper price ({upper}) must be greater than lower price ({lower})")]
    NotAscending { lower: f64, upper: f64 },

    #[error("lower price ({0}) must not be negative")]
    NegativeLower(f64),

    #[error("geometric spacing requires a positive lower price, got {0}")]
    NonPositiveGeometricLower(f64),

    #[error("price ratio {upper}/{lower} overflows geometric spacing")]
    RatioOverflow { lower: f64, upper: f64 },

    #[error("at least 2 grid lines are required, got {0}")]
    TooFewLines(u32),

    #[error("range {lower}..{upper} is too narrow to hold {lines} distinct grid lines")]
    TooNarrow { lower: f64, upper: f64, lines: u32 },
}

/// Why a configuration cannot be projected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigViolation {
    #[error("investment amount must be positive, got {0}")]
    NonPositiveInvestment(Decimal),

    #[error("profit per grid must be positive, got {0}%")]
    NonPositiveProfitRate(Decimal),

    #[error("assumed daily grid crossings must not be negative, got {0}")]
    NegativeCrossings(Decimal),

    #[error("projected profit exceeds the representable range")]
    Overflow,
}

impl From<RangeViolation> for GridError {
    fn from(violation: RangeViolation) -> Self {
        GridError::InvalidRange(violation)
    }
}

impl From<ConfigViolation> for GridError {
    fn from(violation: ConfigViolation) -> Self {
        GridError::InvalidConfiguration(violation)
    }
}

pub type GridResult<T> = Result<T, GridError>;
