//! Account REST API endpoints (authentication required).

mod types;

pub use types::*;

use rust_decimal::Decimal;

use crate::error::BittrexError;
use crate::rest::BittrexRestClient;
use crate::rest::endpoints::account;
use crate::rest::market::TransactionId;
use crate::rest::request::{QueryParams, params};

/// Query with a single optional filter.
fn optional_filter(key: &str, value: Option<&str>) -> QueryParams {
    let mut query = QueryParams::new();
    if let Some(value) = value {
        query.insert(key.to_string(), value.to_string());
    }
    query
}

impl BittrexRestClient {
    /// Get the balances of all currencies held by the account.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bittrex_api_client::auth::StaticCredentials;
    /// use bittrex_api_client::rest::BittrexRestClient;
    /// use std::sync::Arc;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = BittrexRestClient::builder()
    ///         .credentials(Arc::new(StaticCredentials::new("api_key", "api_secret")))
    ///         .build();
    ///
    ///     for balance in client.get_balances().await? {
    ///         println!("{}: {} available", balance.currency, balance.available);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_balances(&self) -> Result<Vec<Balance>, BittrexError> {
        self.private_call(account::GET_BALANCES, QueryParams::new())
            .await
    }

    /// Get the balance of one currency.
    pub async fn get_balance(&self, currency: &str) -> Result<Balance, BittrexError> {
        self.private_call(account::GET_BALANCE, params([("currency", currency.to_string())]))
            .await
    }

    /// Get (or request generation of) the deposit address of a currency.
    ///
    /// While the address is being generated the API rejects the call with
    /// `ADDRESS_GENERATING`; retry later.
    pub async fn get_deposit_address(&self, currency: &str) -> Result<DepositAddress, BittrexError> {
        self.private_call(
            account::GET_DEPOSIT_ADDRESS,
            params([("currency", currency.to_string())]),
        )
        .await
    }

    /// Withdraw funds to an external address.
    ///
    /// # Arguments
    ///
    /// * `currency` - Currency to withdraw (e.g., "BTC").
    /// * `quantity` - Amount to withdraw.
    /// * `address` - Destination address.
    /// * `payment_id` - Memo / payment id for currencies that need one.
    pub async fn withdraw(
        &self,
        currency: &str,
        quantity: Decimal,
        address: &str,
        payment_id: Option<&str>,
    ) -> Result<TransactionId, BittrexError> {
        let mut query = params([
            ("currency", currency.to_string()),
            ("quantity", quantity.to_string()),
            ("address", address.to_string()),
        ]);
        if let Some(payment_id) = payment_id {
            query.insert("paymentid".to_string(), payment_id.to_string());
        }

        self.private_call(account::WITHDRAW, query).await
    }

    /// Get one order of the account by its uuid.
    pub async fn get_order(&self, uuid: &str) -> Result<Order, BittrexError> {
        self.private_call(account::GET_ORDER, params([("uuid", uuid.to_string())]))
            .await
    }

    /// Get the account's order history, optionally restricted to one market.
    pub async fn get_order_history(
        &self,
        market_name: Option<&str>,
    ) -> Result<Vec<OrderHistoryEntry>, BittrexError> {
        self.private_call(
            account::GET_ORDER_HISTORY,
            optional_filter("market", market_name),
        )
        .await
    }

    /// Get the account's withdrawals, optionally restricted to one currency.
    pub async fn get_withdrawal_history(
        &self,
        currency: Option<&str>,
    ) -> Result<Vec<TransactionHistoryEntry>, BittrexError> {
        self.private_call(
            account::GET_WITHDRAWAL_HISTORY,
            optional_filter("currency", currency),
        )
        .await
    }

    /// Get the account's deposits, optionally restricted to one currency.
    pub async fn get_deposit_history(
        &self,
        currency: Option<&str>,
    ) -> Result<Vec<TransactionHistoryEntry>, BittrexError> {
        self.private_call(
            account::GET_DEPOSIT_HISTORY,
            optional_filter("currency", currency),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_filter() {
        assert!(optional_filter("market", None).is_empty());
        assert_eq!(optional_filter("market", Some("BTC-LTC"))["market"], "BTC-LTC");
    }
}
