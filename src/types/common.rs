//! Common domain types for the Bittrex API.

use serde::{Deserialize, Serialize};

/// Buy or sell side of a trade or fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    /// Buy side
    Buy,
    /// Sell side
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Which side(s) of the order book to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBookType {
    /// Bids only
    Buy,
    /// Asks only
    Sell,
    /// Bids and asks
    #[default]
    Both,
}

impl OrderBookType {
    /// Query parameter value.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBookType::Buy => "buy",
            OrderBookType::Sell => "sell",
            OrderBookType::Both => "both",
        }
    }
}

impl std::fmt::Display for OrderBookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candle width for the `getticks` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickInterval {
    /// 1 minute
    #[serde(rename = "oneMin")]
    OneMin,
    /// 5 minutes
    #[serde(rename = "fiveMin")]
    FiveMin,
    /// 30 minutes
    #[serde(rename = "thirtyMin")]
    ThirtyMin,
    /// 1 hour
    #[serde(rename = "hour")]
    Hour,
    /// 1 day
    #[serde(rename = "day")]
    Day,
}

impl TickInterval {
    /// Query parameter value.
    pub fn as_str(&self) -> &'static str {
        match self {
            TickInterval::OneMin => "oneMin",
            TickInterval::FiveMin => "fiveMin",
            TickInterval::ThirtyMin => "thirtyMin",
            TickInterval::Hour => "hour",
            TickInterval::Day => "day",
        }
    }

    /// Get the interval length in minutes.
    pub fn as_minutes(&self) -> u32 {
        match self {
            TickInterval::OneMin => 1,
            TickInterval::FiveMin => 5,
            TickInterval::ThirtyMin => 30,
            TickInterval::Hour => 60,
            TickInterval::Day => 1440,
        }
    }
}

impl std::fmt::Display for TickInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
