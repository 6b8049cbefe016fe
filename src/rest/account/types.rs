//! Types for account endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use time::OffsetDateTime;

use crate::types::serde_helpers::{BittrexDecimal, BittrexTimestamp};

/// Balance of one currency.
///
/// A balance of exactly zero in every field is a legitimate record.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Balance {
    pub currency: String,
    /// Total balance, including funds reserved by open orders.
    #[serde_as(as = "BittrexDecimal")]
    pub balance: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub available: Decimal,
    /// Unconfirmed deposits.
    #[serde_as(as = "BittrexDecimal")]
    pub pending: Decimal,
    #[serde(default)]
    pub crypto_address: Option<String>,
    #[serde(default)]
    pub requested: Option<bool>,
    #[serde(default)]
    pub uuid: Option<String>,
}

/// Deposit address of a currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DepositAddress {
    pub currency: String,
    pub address: String,
}

/// A single order of the account, as returned by `account/getorder`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Order {
    #[serde(default)]
    pub account_id: Option<String>,
    pub order_uuid: String,
    /// Market name, e.g. "BTC-SHLD".
    pub exchange: String,
    /// e.g. "LIMIT_BUY".
    #[serde(rename = "Type")]
    pub order_type: String,
    #[serde_as(as = "BittrexDecimal")]
    pub quantity: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub quantity_remaining: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub limit: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub reserved: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub reserve_remaining: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub commission_reserved: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub commission_reserve_remaining: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub commission_paid: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub price: Decimal,
    #[serde_as(as = "Option<BittrexDecimal>")]
    pub price_per_unit: Option<Decimal>,
    #[serde_as(as = "BittrexTimestamp")]
    pub opened: OffsetDateTime,
    #[serde_as(as = "Option<BittrexTimestamp>")]
    pub closed: Option<OffsetDateTime>,
    pub is_open: bool,
    pub sentinel: String,
    pub cancel_initiated: bool,
    pub immediate_or_cancel: bool,
    pub is_conditional: bool,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub condition_target: Option<String>,
}

/// A completed order, as returned by `account/getorderhistory`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderHistoryEntry {
    pub order_uuid: String,
    pub exchange: String,
    #[serde_as(as = "BittrexTimestamp")]
    #[serde(rename = "TimeStamp")]
    pub timestamp: OffsetDateTime,
    pub order_type: String,
    #[serde_as(as = "BittrexDecimal")]
    pub limit: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub quantity: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub quantity_remaining: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub commission: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub price: Decimal,
    #[serde_as(as = "Option<BittrexDecimal>")]
    pub price_per_unit: Option<Decimal>,
    pub is_conditional: bool,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub condition_target: Option<String>,
    pub immediate_or_cancel: bool,
}

/// A deposit or withdrawal.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionHistoryEntry {
    pub payment_uuid: String,
    pub currency: String,
    #[serde_as(as = "BittrexDecimal")]
    pub amount: Decimal,
    pub address: String,
    #[serde_as(as = "BittrexTimestamp")]
    pub opened: OffsetDateTime,
    pub authorized: bool,
    pub pending_payment: bool,
    #[serde_as(as = "BittrexDecimal")]
    pub tx_cost: Decimal,
    /// Blockchain transaction id, once broadcast.
    #[serde(default)]
    pub tx_id: Option<String>,
    pub canceled: bool,
    pub invalid_address: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_zero_balance() {
        let json = r#"{
            "Currency": "DOGE",
            "Balance": 0.00000000,
            "Available": 0.00000000,
            "Pending": 0.00000000,
            "CryptoAddress": "DLxcEt3AatMyr2NTatzjsfHNoB9NT62HiF",
            "Requested": false,
            "Uuid": null
        }"#;

        let balance: Balance = serde_json::from_str(json).unwrap();
        assert_eq!(balance.currency, "DOGE");
        assert!(balance.balance.is_zero());
        assert_eq!(balance.requested, Some(false));
        assert!(balance.uuid.is_none());
    }

    #[test]
    fn test_deserialize_order() {
        let json = r#"{
            "AccountId": null,
            "OrderUuid": "0cb4c4e4-bdc7-4e13-8c13-430e587d2cc1",
            "Exchange": "BTC-SHLD",
            "Type": "LIMIT_BUY",
            "Quantity": 1000.00000000,
            "QuantityRemaining": 1000.00000000,
            "Limit": 0.00000001,
            "Reserved": 0.00001000,
            "ReserveRemaining": 0.00001000,
            "CommissionReserved": 0.00000002,
            "CommissionReserveRemaining": 0.00000002,
            "CommissionPaid": 0.00000000,
            "Price": 0.00000000,
            "PricePerUnit": null,
            "Opened": "2014-07-13T07:45:46.27",
            "Closed": null,
            "IsOpen": true,
            "Sentinel": "6c454604-22e2-4fb4-892e-179eede20972",
            "CancelInitiated": false,
            "ImmediateOrCancel": false,
            "IsConditional": false,
            "Condition": "NONE",
            "ConditionTarget": null
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_type, "LIMIT_BUY");
        assert_eq!(order.limit.to_string(), "0.00000001");
        assert!(order.is_open);
        assert_eq!(order.condition.as_deref(), Some("NONE"));
    }

    #[test]
    fn test_deserialize_withdrawal() {
        let json = r#"{
            "PaymentUuid": "b52c7a5c-90c6-4c6e-835c-e16df12708b1",
            "Currency": "BTC",
            "Amount": 17.00000000,
            "Address": "1DeaaFBdbB5nrHj87x3NHS4onvw1GPNyAu",
            "Opened": "2014-07-09T04:24:47.217",
            "Authorized": true,
            "PendingPayment": false,
            "TxCost": 0.00020000,
            "TxId": null,
            "Canceled": true,
            "InvalidAddress": false
        }"#;

        let entry: TransactionHistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.amount.to_string(), "17.00000000");
        assert_eq!(entry.opened.millisecond(), 217);
        assert!(entry.tx_id.is_none());
    }

    #[test]
    fn test_deserialize_order_history_entry() {
        let json = r#"{
            "OrderUuid": "fd97d393-e9b9-4dd1-9dbf-f288fc72a185",
            "Exchange": "BTC-LTC",
            "TimeStamp": "2014-07-09T04:01:00.667",
            "OrderType": "LIMIT_BUY",
            "Limit": 0.00000001,
            "Quantity": 100000.00000000,
            "QuantityRemaining": 100000.00000000,
            "Commission": 0.00000000,
            "Price": 0.00000000,
            "PricePerUnit": null,
            "IsConditional": false,
            "Condition": null,
            "ConditionTarget": null,
            "ImmediateOrCancel": false
        }"#;

        let entry: OrderHistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.timestamp.millisecond(), 667);
        assert_eq!(entry.quantity.to_string(), "100000.00000000");
    }
}
