//! Bittrex REST API endpoint constants.

use std::time::Duration;

/// Base URL for the Bittrex REST API, without the version segment.
pub const BITTREX_BASE_URL: &str = "https://bittrex.com/api";

/// Version segment of the documented API.
pub const API_VERSION: &str = "v1.1";

/// Version segment of the undocumented API used by the web frontend.
pub const UNDOCUMENTED_API_VERSION: &str = "v2.0";

/// Default time budget for one REST call (send plus full body read).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Public endpoints (no authentication required).
pub mod public {
    /// List all markets.
    pub const GET_MARKETS: &str = "public/getmarkets";
    /// List all currencies.
    pub const GET_CURRENCIES: &str = "public/getcurrencies";
    /// Current bid/ask/last for one market.
    pub const GET_TICKER: &str = "public/getticker";
    /// 24h summaries for all markets.
    pub const GET_MARKET_SUMMARIES: &str = "public/getmarketsummaries";
    /// 24h summary for one market.
    pub const GET_MARKET_SUMMARY: &str = "public/getmarketsummary";
    /// Order book for one market.
    pub const GET_ORDER_BOOK: &str = "public/getorderbook";
    /// Latest trades for one market.
    pub const GET_MARKET_HISTORY: &str = "public/getmarkethistory";
}

/// Trading endpoints (authentication required).
pub mod market {
    /// Place a limit buy order.
    pub const BUY_LIMIT: &str = "market/buylimit";
    /// Place a limit sell order.
    pub const SELL_LIMIT: &str = "market/selllimit";
    /// Place a market buy order.
    pub const BUY_MARKET: &str = "market/buymarket";
    /// Place a market sell order.
    pub const SELL_MARKET: &str = "market/sellmarket";
    /// Cancel an open order.
    pub const CANCEL: &str = "market/cancel";
    /// List open orders.
    pub const GET_OPEN_ORDERS: &str = "market/getopenorders";
}

/// Account endpoints (authentication required).
pub mod account {
    pub const GET_BALANCES: &str = "account/getbalances";
    pub const GET_BALANCE: &str = "account/getbalance";
    pub const GET_DEPOSIT_ADDRESS: &str = "account/getdepositaddress";
    pub const WITHDRAW: &str = "account/withdraw";
    pub const GET_ORDER: &str = "account/getorder";
    pub const GET_ORDER_HISTORY: &str = "account/getorderhistory";
    pub const GET_WITHDRAWAL_HISTORY: &str = "account/getwithdrawalhistory";
    pub const GET_DEPOSIT_HISTORY: &str = "account/getdeposithistory";
}

/// Endpoints of the undocumented v2.0 API.
pub mod undocumented {
    /// Candles for one market.
    pub const GET_TICKS: &str = "pub/market/getticks";
}
