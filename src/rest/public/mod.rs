//! Public REST API endpoints (no authentication required).

mod types;

pub use types::*;

use crate::error::BittrexError;
use crate::rest::BittrexRestClient;
use crate::rest::endpoints::public;
use crate::rest::request::{QueryParams, params};
use crate::types::OrderBookType;

impl BittrexRestClient {
    /// List all markets.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bittrex_api_client::rest::BittrexRestClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = BittrexRestClient::new();
    ///     for market in client.get_markets().await? {
    ///         println!("{} active={}", market.market_name, market.is_active);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_markets(&self) -> Result<Vec<Market>, BittrexError> {
        self.call(public::GET_MARKETS, QueryParams::new()).await
    }

    /// List all supported currencies.
    pub async fn get_currencies(&self) -> Result<Vec<Currency>, BittrexError> {
        self.call(public::GET_CURRENCIES, QueryParams::new()).await
    }

    /// Get the current ticker of a market.
    ///
    /// # Arguments
    ///
    /// * `market` - Market name (e.g., "BTC-LTC").
    pub async fn get_ticker(&self, market: &str) -> Result<Ticker, BittrexError> {
        self.call(public::GET_TICKER, params([("market", market.to_string())]))
            .await
    }

    /// Get the 24h summaries of all markets.
    pub async fn get_market_summaries(&self) -> Result<Vec<MarketSummary>, BittrexError> {
        self.call(public::GET_MARKET_SUMMARIES, QueryParams::new())
            .await
    }

    /// Get the 24h summary of one market.
    ///
    /// The API wraps the single summary in an array; an empty array is
    /// reported as [`BittrexError::MalformedResult`].
    pub async fn get_market_summary(&self, market: &str) -> Result<MarketSummary, BittrexError> {
        let summaries: Vec<MarketSummary> = self
            .call(public::GET_MARKET_SUMMARY, params([("market", market.to_string())]))
            .await?;

        summaries.into_iter().next().ok_or_else(|| {
            BittrexError::MalformedResult(format!("No summary returned for market {market}"))
        })
    }

    /// Get the order book of a market.
    ///
    /// # Arguments
    ///
    /// * `market` - Market name (e.g., "BTC-LTC").
    /// * `book_type` - Which side(s) to fetch. For a single side the other is left empty.
    pub async fn get_order_book(
        &self,
        market: &str,
        book_type: OrderBookType,
    ) -> Result<OrderBook, BittrexError> {
        let query = params([
            ("market", market.to_string()),
            ("type", book_type.as_str().to_string()),
        ]);

        // Single-sided books come back as a bare array.
        match book_type {
            OrderBookType::Both => self.call(public::GET_ORDER_BOOK, query).await,
            OrderBookType::Buy => Ok(OrderBook {
                buy: self.call(public::GET_ORDER_BOOK, query).await?,
                sell: Vec::new(),
            }),
            OrderBookType::Sell => Ok(OrderBook {
                buy: Vec::new(),
                sell: self.call(public::GET_ORDER_BOOK, query).await?,
            }),
        }
    }

    /// Get the latest trades of a market.
    pub async fn get_market_history(&self, market: &str) -> Result<Vec<Trade>, BittrexError> {
        self.call(public::GET_MARKET_HISTORY, params([("market", market.to_string())]))
            .await
    }
}
