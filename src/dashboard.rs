//! Data shapes exchanged with the bot-management backend
//!
//! The backend itself (transport, storage, order execution) lives elsewhere;
//! these types only pin down the JSON the dashboard sends and receives, plus
//! the labels the bot and transaction tables render from them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::GridResult;
use crate::format;
use crate::grid::GridLevels;
use crate::{GridConfiguration, GridType, Money, Symbol};

/// Exchange API key registered by the user (secret never leaves the backend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: i64,
    pub name: String,
}

/// Body of the create-bot request, built only from validated input
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBotRequest {
    pub name: String,
    pub trading_pair: Symbol,
    pub api_key_id: i64,
    pub is_active: bool,
    #[serde(flatten)]
    pub config: GridConfiguration,
}

/// Performance figures the backend attaches to a bot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotStats {
    #[serde(rename = "profit24h")]
    pub profit_24h: Money,
    #[serde(rename = "profit24hPercentage", with = "rust_decimal::serde::float")]
    pub profit_24h_percentage: Decimal,
}

/// A bot as listed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingBot {
    pub id: i64,
    pub name: String,
    pub trading_pair: Symbol,
    pub lower_price: f64,
    pub upper_price: f64,
    pub grid_lines: u32,
    #[serde(default)]
    pub grid_type: GridType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub stats: Option<BotStats>,
}

impl TradingBot {
    /// "$60000.00 - $70000.00"
    pub fn grid_range_label(&self) -> String {
        format!(
            "${} - ${}",
            format::price(self.lower_price),
            format::price(self.upper_price)
        )
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_active {
            "Active"
        } else {
            "Stopped"
        }
    }

    /// Label of the start/stop toggle button
    pub fn toggle_label(&self) -> &'static str {
        if self.is_active {
            "Stop"
        } else {
            "Start"
        }
    }

    /// "+$1.25 (0.50%)", or "Calculating..." until stats arrive
    pub fn profit_24h_label(&self) -> String {
        match &self.stats {
            Some(stats) => format!(
                "+{}",
                format::amount_with_percent(stats.profit_24h, stats.profit_24h_percentage)
            ),
            None => "Calculating...".to_string(),
        }
    }

    /// "Created 2024-03-01"
    pub fn created_label(&self) -> String {
        format!("Created {}", self.created_at.format("%Y-%m-%d"))
    }

    /// Grid levels for overlaying this bot on a price chart
    pub fn levels(&self) -> GridResult<GridLevels> {
        GridLevels::compute(
            self.lower_price,
            self.upper_price,
            self.grid_lines,
            self.grid_type,
        )
    }
}

/// Direction of an executed grid order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

/// Decimal places shown for traded base-asset amounts
const AMOUNT_DP: u32 = 4;

/// An order fill reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub bot_id: i64,
    pub trading_pair: Symbol,
    #[serde(rename = "type")]
    pub side: Side,
    pub price: f64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub value: Money,
    #[serde(default)]
    pub profit: Option<Money>,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// "Bot #3"
    pub fn bot_label(&self) -> String {
        format!("Bot #{}", self.bot_id)
    }

    /// "$65000.00"
    pub fn price_label(&self) -> String {
        format!("${}", format::price(self.price))
    }

    /// "0.0150 BTC"
    pub fn amount_label(&self) -> String {
        format!(
            "{} {}",
            format::fixed(self.amount, AMOUNT_DP),
            self.trading_pair.base_asset()
        )
    }

    pub fn value_label(&self) -> String {
        format::usd(self.value)
    }

    /// "+$1.25" for a gain, "-" when the fill realised nothing
    pub fn profit_label(&self) -> String {
        match self.profit {
            Some(profit) if profit.is_positive() => format!("+{}", format::usd(profit)),
            Some(profit) if !profit.is_zero() => format::usd(profit),
            _ => "-".to_string(),
        }
    }

    pub fn time_label(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
