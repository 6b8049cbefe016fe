//! Trading REST API endpoints (authentication required).
//!
//! These calls change account state and are never retried by the client.

mod types;

pub use types::*;

use rust_decimal::Decimal;

use crate::error::BittrexError;
use crate::rest::BittrexRestClient;
use crate::rest::endpoints::market;
use crate::rest::request::{QueryParams, params};

/// Parameters shared by the four order placement calls.
fn order_params(market_name: &str, quantity: Decimal, rate: Decimal) -> QueryParams {
    params([
        ("market", market_name.to_string()),
        ("quantity", quantity.to_string()),
        ("rate", rate.to_string()),
    ])
}

impl BittrexRestClient {
    /// Place a limit buy order.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bittrex_api_client::auth::EnvCredentials;
    /// use bittrex_api_client::rest::BittrexRestClient;
    /// use rust_decimal::Decimal;
    /// use std::sync::Arc;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let credentials = EnvCredentials::try_from_env().ok_or("credentials not set")?;
    ///     let client = BittrexRestClient::builder()
    ///         .credentials(Arc::new(credentials))
    ///         .build();
    ///
    ///     let order = client
    ///         .buy_limit("BTC-LTC", Decimal::new(1, 0), Decimal::new(1, 8))
    ///         .await?;
    ///     println!("Placed order {}", order.uuid);
    ///     Ok(())
    /// }
    /// ```
    pub async fn buy_limit(
        &self,
        market_name: &str,
        quantity: Decimal,
        rate: Decimal,
    ) -> Result<TransactionId, BittrexError> {
        self.private_call(market::BUY_LIMIT, order_params(market_name, quantity, rate))
            .await
    }

    /// Place a limit sell order.
    pub async fn sell_limit(
        &self,
        market_name: &str,
        quantity: Decimal,
        rate: Decimal,
    ) -> Result<TransactionId, BittrexError> {
        self.private_call(market::SELL_LIMIT, order_params(market_name, quantity, rate))
            .await
    }

    /// Place a market buy order.
    pub async fn buy_market(
        &self,
        market_name: &str,
        quantity: Decimal,
        rate: Decimal,
    ) -> Result<TransactionId, BittrexError> {
        self.private_call(market::BUY_MARKET, order_params(market_name, quantity, rate))
            .await
    }

    /// Place a market sell order.
    pub async fn sell_market(
        &self,
        market_name: &str,
        quantity: Decimal,
        rate: Decimal,
    ) -> Result<TransactionId, BittrexError> {
        self.private_call(market::SELL_MARKET, order_params(market_name, quantity, rate))
            .await
    }

    /// Cancel an open order.
    pub async fn cancel_order(&self, uuid: &str) -> Result<(), BittrexError> {
        self.private_call(market::CANCEL, params([("uuid", uuid.to_string())]))
            .await
    }

    /// List the account's open orders in a market.
    pub async fn get_open_orders(&self, market_name: &str) -> Result<Vec<OpenOrder>, BittrexError> {
        self.private_call(
            market::GET_OPEN_ORDERS,
            params([("market", market_name.to_string())]),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_params_keep_exact_decimals() {
        let query = order_params(
            "BTC-LTC",
            "100.00000000".parse().unwrap(),
            "0.00000820".parse().unwrap(),
        );

        assert_eq!(query["market"], "BTC-LTC");
        assert_eq!(query["quantity"], "100.00000000");
        assert_eq!(query["rate"], "0.00000820");
    }
}
