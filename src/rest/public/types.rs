//! Types for public REST API endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use time::OffsetDateTime;

use crate::types::OrderSide;
use crate::types::serde_helpers::{BittrexDecimal, BittrexTimestamp};

/// A tradable market, as listed by `public/getmarkets`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Market {
    /// Traded currency, e.g. "LTC".
    pub market_currency: String,
    /// Quote currency, e.g. "BTC".
    pub base_currency: String,
    pub market_currency_long: String,
    pub base_currency_long: String,
    /// Smallest order quantity accepted.
    #[serde_as(as = "BittrexDecimal")]
    pub min_trade_size: Decimal,
    /// Market name, e.g. "BTC-LTC".
    pub market_name: String,
    pub is_active: bool,
    #[serde_as(as = "BittrexTimestamp")]
    pub created: OffsetDateTime,
    #[serde(default)]
    pub notice: Option<String>,
}

/// A currency, as listed by `public/getcurrencies`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Currency {
    /// Ticker symbol, e.g. "BTC".
    pub currency: String,
    /// Full name, e.g. "Bitcoin".
    pub currency_long: String,
    /// Confirmations required before a deposit is credited.
    pub min_confirmation: u32,
    /// Withdrawal fee.
    #[serde_as(as = "BittrexDecimal")]
    pub tx_fee: Decimal,
    pub is_active: bool,
    pub coin_type: String,
    #[serde(default)]
    pub base_address: Option<String>,
    #[serde(default)]
    pub notice: Option<String>,
}

/// Current top of book and last price for a market.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ticker {
    #[serde_as(as = "BittrexDecimal")]
    pub bid: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub ask: Decimal,
    /// Last trade price; `None` for markets that never traded.
    #[serde_as(as = "Option<BittrexDecimal>")]
    pub last: Option<Decimal>,
}

/// 24h rolling summary of a market.
///
/// Price fields are `None` for markets without recent activity.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MarketSummary {
    pub market_name: String,
    #[serde_as(as = "Option<BittrexDecimal>")]
    pub high: Option<Decimal>,
    #[serde_as(as = "Option<BittrexDecimal>")]
    pub low: Option<Decimal>,
    /// Volume in the market currency.
    #[serde_as(as = "Option<BittrexDecimal>")]
    pub volume: Option<Decimal>,
    #[serde_as(as = "Option<BittrexDecimal>")]
    pub last: Option<Decimal>,
    /// Volume in the base currency.
    #[serde_as(as = "Option<BittrexDecimal>")]
    pub base_volume: Option<Decimal>,
    #[serde_as(as = "BittrexTimestamp")]
    #[serde(rename = "TimeStamp")]
    pub timestamp: OffsetDateTime,
    #[serde_as(as = "Option<BittrexDecimal>")]
    pub bid: Option<Decimal>,
    #[serde_as(as = "Option<BittrexDecimal>")]
    pub ask: Option<Decimal>,
    pub open_buy_orders: u32,
    pub open_sell_orders: u32,
    /// Price 24 hours ago.
    #[serde_as(as = "Option<BittrexDecimal>")]
    pub prev_day: Option<Decimal>,
    #[serde_as(as = "BittrexTimestamp")]
    pub created: OffsetDateTime,
    #[serde(default)]
    pub display_market_name: Option<String>,
}

/// One price level of the order book.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderBookEntry {
    #[serde_as(as = "BittrexDecimal")]
    pub quantity: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub rate: Decimal,
}

/// Order book of a market.
///
/// When only one side was requested the other side is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Bids, best first.
    #[serde(default)]
    pub buy: Vec<OrderBookEntry>,
    /// Asks, best first.
    #[serde(default)]
    pub sell: Vec<OrderBookEntry>,
}

/// A public trade, as returned by `public/getmarkethistory`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Trade {
    pub id: u64,
    #[serde_as(as = "BittrexTimestamp")]
    #[serde(rename = "TimeStamp")]
    pub timestamp: OffsetDateTime,
    #[serde_as(as = "BittrexDecimal")]
    pub quantity: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub price: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub total: Decimal,
    /// "FILL" or "PARTIAL_FILL".
    pub fill_type: String,
    pub order_type: OrderSide,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_market_summary() {
        let json = r#"{
            "MarketName": "BTC-888",
            "High": 0.00000919,
            "Low": 0.00000820,
            "Volume": 74339.61396015,
            "Last": 0.00000820,
            "BaseVolume": 0.64966963,
            "TimeStamp": "2014-07-09T07:19:30.15",
            "Bid": 0.00000820,
            "Ask": 0.00000831,
            "OpenBuyOrders": 15,
            "OpenSellOrders": 15,
            "PrevDay": 0.00000821,
            "Created": "2014-03-20T06:00:00",
            "DisplayMarketName": null
        }"#;

        let summary: MarketSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.market_name, "BTC-888");
        assert_eq!(summary.volume.unwrap().to_string(), "74339.61396015");
        assert_eq!(summary.timestamp.millisecond(), 150);
        assert_eq!(summary.open_buy_orders, 15);
        assert!(summary.display_market_name.is_none());
    }

    #[test]
    fn test_deserialize_inactive_market_summary() {
        let json = r#"{
            "MarketName": "BTC-DEAD",
            "High": null, "Low": null, "Volume": null, "Last": null,
            "BaseVolume": null, "TimeStamp": "2017-12-01T00:00:00",
            "Bid": null, "Ask": null, "OpenBuyOrders": 0, "OpenSellOrders": 0,
            "PrevDay": null, "Created": "2014-03-20T06:00:00"
        }"#;

        let summary: MarketSummary = serde_json::from_str(json).unwrap();
        assert!(summary.last.is_none());
        assert!(summary.bid.is_none());
    }

    #[test]
    fn test_deserialize_trade() {
        let json = r#"{
            "Id": 319435,
            "TimeStamp": "2014-07-09T03:21:20.08",
            "Quantity": 0.30802438,
            "Price": 0.01263400,
            "Total": 0.00389158,
            "FillType": "FILL",
            "OrderType": "BUY"
        }"#;

        let trade: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(trade.id, 319435);
        assert_eq!(trade.order_type, OrderSide::Buy);
        assert_eq!(trade.price.to_string(), "0.01263400");
    }

    #[test]
    fn test_deserialize_market() {
        let json = r#"{
            "MarketCurrency": "LTC",
            "BaseCurrency": "BTC",
            "MarketCurrencyLong": "Litecoin",
            "BaseCurrencyLong": "Bitcoin",
            "MinTradeSize": 0.01000000,
            "MarketName": "BTC-LTC",
            "IsActive": true,
            "Created": "2014-02-13T00:00:00"
        }"#;

        let market: Market = serde_json::from_str(json).unwrap();
        assert_eq!(market.market_name, "BTC-LTC");
        assert_eq!(market.min_trade_size.to_string(), "0.01000000");
        assert!(market.notice.is_none());
    }

    #[test]
    fn test_deserialize_order_book() {
        let json = r#"{
            "buy": [{"Quantity": 12.37, "Rate": 0.02525}],
            "sell": [{"Quantity": "32.55412402", "Rate": "0.02540000"}]
        }"#;

        let book: OrderBook = serde_json::from_str(json).unwrap();
        assert_eq!(book.buy.len(), 1);
        assert_eq!(book.sell[0].quantity.to_string(), "32.55412402");
    }
}
