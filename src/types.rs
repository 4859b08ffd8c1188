//! Core data types used across the estimator

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;
use thiserror::Error;

// ============================================================================
// Grid configuration
// ============================================================================

/// Spacing rule between consecutive grid lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridType {
    /// Equal absolute price difference between lines
    Arithmetic,
    /// Equal multiplicative ratio between lines
    #[default]
    Geometric,
}

impl GridType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridType::Arithmetic => "arithmetic",
            GridType::Geometric => "geometric",
        }
    }
}

impl fmt::Display for GridType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GridType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arithmetic" => Ok(GridType::Arithmetic),
            "geometric" => Ok(GridType::Geometric),
            other => Err(format!(
                "unknown grid type '{}' (expected arithmetic or geometric)",
                other
            )),
        }
    }
}

/// Grid parameters for a single computation.
///
/// Prices stay `f64` because geometric spacing needs fractional powers.
/// Investment and profit rate are decimals so profit projections scale
/// exactly with the amount invested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfiguration {
    pub lower_price: f64,
    pub upper_price: f64,
    pub grid_lines: u32,
    pub grid_type: GridType,
    /// Target gain per completed grid cycle, in percent (0.53 = 0.53%)
    #[serde(with = "rust_decimal::serde::float")]
    pub profit_per_grid: Decimal,
    pub investment_amount: Money,
}

// ============================================================================
// Candles
// ============================================================================

/// Validation errors for candle data
#[derive(Debug, Error)]
pub enum CandleValidationError {
    #[error("high ({high}) must be >= low ({low})")]
    HighLessThanLow { high: f64, low: f64 },

    #[error("close ({close}) must be between low ({low}) and high ({high})")]
    CloseOutOfRange { close: f64, low: f64, high: f64 },

    #[error("prices must be positive: open={open}, high={high}, low={low}, close={close}")]
    NonPositivePrice {
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },
}

/// OHLCV candlestick used as the chart background for grid overlays
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub datetime: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Validate the candle data
    pub fn validate(&self) -> Result<(), CandleValidationError> {
        if self.open <= 0.0 || self.high <= 0.0 || self.low <= 0.0 || self.close <= 0.0 {
            return Err(CandleValidationError::NonPositivePrice {
                open: self.open,
                high: self.high,
                low: self.low,
                close: self.close,
            });
        }

        if self.high < self.low {
            return Err(CandleValidationError::HighLessThanLow {
                high: self.high,
                low: self.low,
            });
        }

        if self.close < self.low || self.close > self.high {
            return Err(CandleValidationError::CloseOutOfRange {
                close: self.close,
                low: self.low,
                high: self.high,
            });
        }

        Ok(())
    }
}

/// Trading pair symbol, e.g. "BTCUSDT"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: impl AsRef<str>) -> Self {
        Symbol(s.as_ref().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base asset of the pair ("BTC" for "BTCUSDT" or "BTC/USDT")
    pub fn base_asset(&self) -> &str {
        if let Some((base, _)) = self.0.split_once('/') {
            return base;
        }
        const QUOTES: &[&str] = &["USDT", "USDC", "BUSD", "USD"];
        QUOTES
            .iter()
            .find_map(|q| self.0.strip_suffix(q).filter(|b| !b.is_empty()))
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Money Type - Precise Decimal Arithmetic for Monetary Values
// ============================================================================

/// Quote-currency amount backed by `rust_decimal::Decimal`.
///
/// Projected profits never drift between the daily and monthly figures.
/// Serialises as a JSON number.
///
/// # Example
/// ```
/// use grid_estimator::Money;
/// use rust_decimal_macros::dec;
///
/// let investment = Money::try_from_f64(100.0).unwrap();
/// assert_eq!(investment * dec!(0.0053), Money::new(dec!(0.53)));
/// assert!(Money::try_from_f64(1e30).is_none());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Money(value)
    }

    /// Convert from f64, or `None` when the value is not finite or lies
    /// outside the range a `Decimal` can hold.
    pub fn try_from_f64(value: f64) -> Option<Self> {
        Decimal::try_from(value).ok().map(Money)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Strictly greater than zero
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn inner(self) -> Decimal {
        self.0
    }
}

/// Scale by a dimensionless factor (rates, counts)
impl Mul<Decimal> for Money {
    type Output = Self;
    fn mul(self, rhs: Decimal) -> Self::Output {
        Money(self.0 * rhs)
    }
}

#[cfg(test)]
mod money_tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_precision() {
        // 0.1 + 0.2 != 0.3 in f64
        let a = Money::try_from_f64(0.1).unwrap().inner();
        let b = Money::try_from_f64(0.2).unwrap().inner();
        assert_eq!(Money::new(a + b), Money::try_from_f64(0.3).unwrap());
    }

    #[test]
    fn test_money_scale_by_decimal() {
        let investment = Money::new(dec!(100));
        assert_eq!(investment * dec!(0.0053), Money::new(dec!(0.53)));
    }

    #[test]
    fn test_money_rejects_unrepresentable_f64() {
        assert!(Money::try_from_f64(f64::NAN).is_none());
        assert!(Money::try_from_f64(f64::INFINITY).is_none());
        assert!(Money::try_from_f64(1e30).is_none());
        assert_eq!(
            Money::try_from_f64(250.5),
            Some(Money::new(dec!(250.5)))
        );
    }

    #[test]
    fn test_money_sign() {
        assert!(Money::new(dec!(0.01)).is_positive());
        assert!(!Money::ZERO.is_positive());
        assert!(!Money::new(dec!(-3)).is_positive());
        assert!(Money::default().is_zero());
    }

    #[test]
    fn test_money_serializes_as_number() {
        let json = serde_json::to_string(&Money::new(dec!(15.9))).unwrap();
        assert_eq!(json, "15.9");
        let parsed: Money = serde_json::from_str("15.9").unwrap();
        assert_eq!(parsed, Money::new(dec!(15.9)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_type_parse() {
        assert_eq!("Arithmetic".parse::<GridType>(), Ok(GridType::Arithmetic));
        assert_eq!(" geometric ".parse::<GridType>(), Ok(GridType::Geometric));
        assert!("fibonacci".parse::<GridType>().is_err());
    }

    #[test]
    fn test_grid_type_serde_lowercase() {
        let json = serde_json::to_string(&GridType::Arithmetic).unwrap();
        assert_eq!(json, "\"arithmetic\"");
        assert_eq!(GridType::default(), GridType::Geometric);
    }

    #[test]
    fn test_symbol_base_asset() {
        assert_eq!(Symbol::new("BTCUSDT").base_asset(), "BTC");
        assert_eq!(Symbol::new("ETH/USDT").base_asset(), "ETH");
        assert_eq!(Symbol::new("USDT").base_asset(), "USDT");
        assert_eq!(Symbol::new("XRPEUR").base_asset(), "XRPEUR");
    }

    #[test]
    fn test_candle_validation() {
        let mut candle = Candle {
            datetime: Utc::now(),
            open: 100.0,
            high: 110.0,
            low: 95.0,
            close: 105.0,
            volume: 10.0,
        };
        assert!(candle.validate().is_ok());

        candle.close = 120.0;
        assert!(matches!(
            candle.validate(),
            Err(CandleValidationError::CloseOutOfRange { .. })
        ));

        candle.low = 0.0;
        assert!(matches!(
            candle.validate(),
            Err(CandleValidationError::NonPositivePrice { .. })
        ));
    }
}
