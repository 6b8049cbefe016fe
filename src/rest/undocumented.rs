//! Endpoints of the undocumented v2.0 API.
//!
//! These are the calls the Bittrex web frontend makes. They are routed
//! through the same signing pipeline with the [`UNDOCUMENTED_API_FLAG`]
//! pseudo-parameter and may change without notice.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use time::OffsetDateTime;

use crate::error::BittrexError;
use crate::rest::BittrexRestClient;
use crate::rest::endpoints::undocumented;
use crate::rest::request::{UNDOCUMENTED_API_FLAG, params};
use crate::types::TickInterval;
use crate::types::serde_helpers::{BittrexDecimal, BittrexTimestamp};

/// One OHLCV candle.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Candle open time.
    #[serde_as(as = "BittrexTimestamp")]
    #[serde(rename = "T")]
    pub timestamp: OffsetDateTime,
    #[serde_as(as = "BittrexDecimal")]
    #[serde(rename = "O")]
    pub open: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    #[serde(rename = "C")]
    pub close: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    #[serde(rename = "H")]
    pub high: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    #[serde(rename = "L")]
    pub low: Decimal,
    /// Volume in the market currency (the LTC in BTC-LTC).
    #[serde_as(as = "BittrexDecimal")]
    #[serde(rename = "V")]
    pub volume: Decimal,
    /// Volume in the base currency (the BTC in BTC-LTC).
    #[serde_as(as = "BittrexDecimal")]
    #[serde(rename = "BV")]
    pub base_volume: Decimal,
}

impl BittrexRestClient {
    /// Get the candles of a market.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bittrex_api_client::rest::BittrexRestClient;
    /// use bittrex_api_client::types::TickInterval;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = BittrexRestClient::new();
    ///     let candles = client.get_ticks("BTC-LTC", TickInterval::Hour).await?;
    ///     if let Some(last) = candles.last() {
    ///         println!("Last close: {}", last.close);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_ticks(
        &self,
        market_name: &str,
        interval: TickInterval,
    ) -> Result<Vec<Candle>, BittrexError> {
        let query = params([
            ("marketName", market_name.to_string()),
            ("tickInterval", interval.as_str().to_string()),
            (UNDOCUMENTED_API_FLAG, "true".to_string()),
        ]);

        self.call(undocumented::GET_TICKS, query).await
    }
}
