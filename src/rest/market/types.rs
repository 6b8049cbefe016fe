//! Types for trading endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use time::OffsetDateTime;

use crate::types::serde_helpers::{BittrexDecimal, BittrexTimestamp};

/// Identifier of an order or withdrawal created by a call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId {
    pub uuid: String,
}

/// An open order, as returned by `market/getopenorders`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OpenOrder {
    #[serde(default)]
    pub uuid: Option<String>,
    pub order_uuid: String,
    /// Market name, e.g. "BTC-LTC".
    pub exchange: String,
    /// e.g. "LIMIT_SELL".
    pub order_type: String,
    #[serde_as(as = "BittrexDecimal")]
    pub quantity: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub quantity_remaining: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub limit: Decimal,
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
    pub cancel_initiated: bool,
    pub immediate_or_cancel: bool,
    pub is_conditional: bool,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub condition_target: Option<String>,
}
