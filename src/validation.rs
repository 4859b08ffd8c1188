//! Bot form validation
//!
//! Turns raw form input into a `CreateBotRequest`. Every field is checked
//! independently and all violations are returned together so a form can
//! flag each offending field at once.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ValidationLimits;
use crate::dashboard::{ApiKey, CreateBotRequest};
use crate::{GridConfiguration, GridType, Money, Symbol};

/// Numeric form fields arrive as numbers or text; coerce them the way a
/// browser form does. Empty text and null become 0, unparseable text NaN.
mod coerce {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(from_value(&value))
    }

    pub(super) fn from_value(value: &Value) -> f64 {
        match value {
            Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    0.0
                } else {
                    s.parse().unwrap_or(f64::NAN)
                }
            }
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Array(_) | Value::Object(_) => f64::NAN,
        }
    }
}

/// Unvalidated bot form values
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawBotInput {
    pub name: String,
    pub trading_pair: String,
    #[serde(deserialize_with = "coerce::number")]
    pub investment_amount: f64,
    #[serde(deserialize_with = "coerce::number")]
    pub api_key_id: f64,
    pub grid_type: String,
    #[serde(deserialize_with = "coerce::number")]
    pub upper_price: f64,
    #[serde(deserialize_with = "coerce::number")]
    pub lower_price: f64,
    #[serde(deserialize_with = "coerce::number")]
    pub grid_lines: f64,
    #[serde(deserialize_with = "coerce::number")]
    pub profit_per_grid: f64,
    pub is_active: bool,
}

impl Default for RawBotInput {
    /// Values a fresh bot form starts with
    fn default() -> Self {
        Self {
            name: String::new(),
            trading_pair: "BTCUSDT".to_string(),
            investment_amount: 100.0,
            api_key_id: 0.0,
            grid_type: GridType::Geometric.as_str().to_string(),
            upper_price: 0.0,
            lower_price: 0.0,
            grid_lines: 20.0,
            profit_per_grid: 0.53,
            is_active: true,
        }
    }
}

impl RawBotInput {
    /// Grid parameters as currently entered, ignoring form limits.
    ///
    /// Used for live estimates while the form still has errors; the
    /// estimator itself decides whether the numbers are usable.
    pub fn preview_configuration(&self) -> Result<GridConfiguration, String> {
        let grid_type: GridType = self.grid_type.parse()?;
        Ok(GridConfiguration {
            lower_price: self.lower_price,
            upper_price: self.upper_price,
            // Saturating cast: NaN and negatives become 0
            grid_lines: self.grid_lines as u32,
            grid_type,
            profit_per_grid: Decimal::try_from(self.profit_per_grid)
                .map_err(|_| format!("profit per grid {} is out of range", self.profit_per_grid))?,
            investment_amount: Money::try_from_f64(self.investment_amount).ok_or_else(|| {
                format!("investment amount {} is out of range", self.investment_amount)
            })?,
        })
    }
}

/// Form field a validation message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    TradingPair,
    InvestmentAmount,
    ApiKeyId,
    GridType,
    UpperPrice,
    LowerPrice,
    /// Cross-field ordering of lower and upper price
    PriceRange,
    GridLines,
    ProfitPerGrid,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::TradingPair => "tradingPair",
            Field::InvestmentAmount => "investmentAmount",
            Field::ApiKeyId => "apiKeyId",
            Field::GridType => "gridType",
            Field::UpperPrice => "upperPrice",
            Field::LowerPrice => "lowerPrice",
            Field::PriceRange => "priceRange",
            Field::GridLines => "gridLines",
            Field::ProfitPerGrid => "profitPerGrid",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation failure, rendered next to its field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

const EXPECTED_NUMBER: &str = "Expected number";

/// Bot form validator
#[derive(Debug, Clone, Default)]
pub struct Validator {
    limits: ValidationLimits,
}

impl Validator {
    pub fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Validate every field and build the create-bot request.
    ///
    /// `known_keys` is the list of API keys the user has registered; the
    /// selected key must be one of them.
    pub fn validate(
        &self,
        raw: &RawBotInput,
        known_keys: &[ApiKey],
    ) -> Result<CreateBotRequest, Vec<FieldError>> {
        let limits = &self.limits;
        let mut errors = Vec::new();

        if raw.name.trim().is_empty() {
            errors.push(FieldError::new(Field::Name, "Bot name is required"));
        }

        if raw.trading_pair.trim().is_empty() {
            errors.push(FieldError::new(Field::TradingPair, "Trading pair is required"));
        }

        let investment = if !raw.investment_amount.is_finite() {
            errors.push(FieldError::new(Field::InvestmentAmount, EXPECTED_NUMBER));
            None
        } else if raw.investment_amount < limits.min_investment {
            errors.push(FieldError::new(
                Field::InvestmentAmount,
                format!(
                    "Investment must be at least {} {}",
                    limits.min_investment, limits.quote_currency
                ),
            ));
            None
        } else {
            let investment = Money::try_from_f64(raw.investment_amount);
            if investment.is_none() {
                errors.push(FieldError::new(
                    Field::InvestmentAmount,
                    "Investment amount is too large",
                ));
            }
            investment
        };

        let api_key_id = self.check_api_key(raw.api_key_id, known_keys, &mut errors);

        let grid_type = match raw.grid_type.parse::<GridType>() {
            Ok(grid_type) => Some(grid_type),
            Err(_) => {
                errors.push(FieldError::new(
                    Field::GridType,
                    "Grid type must be arithmetic or geometric",
                ));
                None
            }
        };

        let upper_ok = check_price(raw.upper_price, Field::UpperPrice, "Upper", &mut errors);
        let lower_ok = check_price(raw.lower_price, Field::LowerPrice, "Lower", &mut errors);
        if upper_ok && lower_ok && raw.lower_price >= raw.upper_price {
            errors.push(FieldError::new(
                Field::PriceRange,
                "Lower price must be below upper price",
            ));
        }

        let grid_lines = self.check_grid_lines(raw.grid_lines, &mut errors);

        let profit_per_grid = self.check_profit_per_grid(raw.profit_per_grid, &mut errors);

        match (api_key_id, grid_type, grid_lines, investment, profit_per_grid) {
            (
                Some(api_key_id),
                Some(grid_type),
                Some(grid_lines),
                Some(investment_amount),
                Some(profit_per_grid),
            ) if errors.is_empty() => {
                Ok(CreateBotRequest {
                    name: raw.name.trim().to_string(),
                    trading_pair: Symbol::new(raw.trading_pair.trim()),
                    api_key_id,
                    is_active: raw.is_active,
                    config: GridConfiguration {
                        lower_price: raw.lower_price,
                        upper_price: raw.upper_price,
                        grid_lines,
                        grid_type,
                        profit_per_grid,
                        investment_amount,
                    },
                })
            }
            _ => Err(errors),
        }
    }

    fn check_api_key(
        &self,
        raw_id: f64,
        known_keys: &[ApiKey],
        errors: &mut Vec<FieldError>,
    ) -> Option<i64> {
        if !raw_id.is_finite() || raw_id < 1.0 {
            let message = if known_keys.is_empty() {
                "API key is required; add one in API settings first"
            } else {
                "API key is required"
            };
            errors.push(FieldError::new(Field::ApiKeyId, message));
            return None;
        }

        let id = raw_id as i64;
        if raw_id.fract() != 0.0 || !known_keys.iter().any(|key| key.id == id) {
            errors.push(FieldError::new(
                Field::ApiKeyId,
                format!("API key {} does not exist", raw_id),
            ));
            return None;
        }

        Some(id)
    }

    fn check_profit_per_grid(&self, raw: f64, errors: &mut Vec<FieldError>) -> Option<Decimal> {
        let limits = &self.limits;
        let message = if !raw.is_finite() {
            EXPECTED_NUMBER.to_string()
        } else if raw < limits.min_profit_per_grid {
            format!(
                "Profit per grid must be at least {}%",
                limits.min_profit_per_grid
            )
        } else if raw > limits.max_profit_per_grid {
            format!(
                "Profit per grid cannot exceed {}%",
                limits.max_profit_per_grid
            )
        } else {
            match Decimal::try_from(raw) {
                Ok(rate) if rate > Decimal::ZERO => return Some(rate),
                _ => "Profit per grid is out of range".to_string(),
            }
        };
        errors.push(FieldError::new(Field::ProfitPerGrid, message));
        None
    }

    fn check_grid_lines(&self, raw: f64, errors: &mut Vec<FieldError>) -> Option<u32> {
        let limits = &self.limits;
        let message = if !raw.is_finite() {
            EXPECTED_NUMBER.to_string()
        } else if raw.fract() != 0.0 {
            "Grid lines must be a whole number".to_string()
        } else if raw < f64::from(limits.min_grid_lines) {
            format!("Must have at least {} grid lines", limits.min_grid_lines)
        } else if raw > f64::from(limits.max_grid_lines) {
            format!("Cannot exceed {} grid lines", limits.max_grid_lines)
        } else {
            return Some(raw as u32);
        };
        errors.push(FieldError::new(Field::GridLines, message));
        None
    }
}

fn check_price(value: f64, field: Field, label: &str, errors: &mut Vec<FieldError>) -> bool {
    if !value.is_finite() {
        errors.push(FieldError::new(field, EXPECTED_NUMBER));
        false
    } else if value < 0.0 {
        errors.push(FieldError::new(field, format!("{} price is required", label)));
        false
    } else {
        true
    }
}

/// Validate with the default limits
pub fn validate(
    raw: &RawBotInput,
    known_keys: &[ApiKey],
) -> Result<CreateBotRequest, Vec<FieldError>> {
    Validator::default().validate(raw, known_keys)
}
