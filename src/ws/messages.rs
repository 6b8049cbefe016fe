//! Push protocol frames and exchange state payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;
use serde_with::serde_as;
use time::OffsetDateTime;

use crate::types::OrderSide;
use crate::types::serde_helpers::{BittrexDecimal, BittrexTimestamp};

/// Hub exposing the exchange feeds.
pub const CORE_HUB: &str = "CoreHub";
/// Hub method subscribing the connection to order book and fill deltas.
pub const SUBSCRIBE_METHOD: &str = "SubscribeToExchangeDeltas";
/// Hub method returning the current state of a market.
pub const QUERY_METHOD: &str = "QueryExchangeState";
/// Client method the hub invokes for every delta.
pub const UPDATE_METHOD: &str = "updateExchangeState";
/// Version of the hub client protocol spoken by this crate.
pub const CLIENT_PROTOCOL: &str = "1.5";

/// A method invocation pushed by a hub to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubMessage {
    /// Hub name.
    #[serde(rename = "H")]
    pub hub: String,
    /// Client method name.
    #[serde(rename = "M")]
    pub method: String,
    /// Raw arguments, one payload each.
    #[serde(rename = "A", default)]
    pub args: Vec<Value>,
}

/// A method invocation sent by the client to a hub.
#[derive(Debug, Clone, Serialize)]
pub struct HubInvocation<'a> {
    #[serde(rename = "H")]
    pub hub: &'a str,
    #[serde(rename = "M")]
    pub method: &'a str,
    #[serde(rename = "A")]
    pub args: &'a [Value],
    /// Correlates the reply with this call.
    #[serde(rename = "I")]
    pub invocation_id: u64,
}

/// Any frame received on the push socket.
///
/// Frames are sparse objects; which keys are present decides what the frame
/// means (see [`ServerFrame::classify`]).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerFrame {
    /// Message cursor.
    #[serde(rename = "C", default)]
    pub message_id: Option<String>,
    /// Set to 1 on the frame confirming the connection is initialized.
    #[serde(rename = "S", default)]
    pub initialized: Option<u8>,
    /// Pushed hub messages.
    #[serde(rename = "M", default)]
    pub messages: Vec<HubMessage>,
    /// Invocation id of a reply, sent as a number or a numeric string.
    #[serde(rename = "I", default, deserialize_with = "invocation_id")]
    pub invocation_id: Option<u64>,
    /// Return value of a successful invocation.
    #[serde(rename = "R", default)]
    pub result: Option<Value>,
    /// Error of a failed invocation.
    #[serde(rename = "E", default)]
    pub error: Option<String>,
}

fn invocation_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => s.parse().map(Some).map_err(de::Error::custom),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid invocation id {n}"))),
        Some(other) => Err(de::Error::custom(format!("invalid invocation id {other}"))),
    }
}

/// What a [`ServerFrame`] means to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// `{}` or an empty cursor frame.
    KeepAlive,
    /// The connection is ready for `start`.
    Initialized,
    /// Reply to an invocation.
    Reply {
        invocation_id: u64,
        outcome: Result<Value, String>,
    },
    /// One or more hub messages.
    Messages(Vec<HubMessage>),
}

impl ServerFrame {
    /// Parse a text frame.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Decide what this frame means.
    pub fn classify(self) -> ServerMessage {
        if let Some(invocation_id) = self.invocation_id {
            let outcome = match self.error {
                Some(error) => Err(error),
                None => Ok(self.result.unwrap_or(Value::Null)),
            };
            return ServerMessage::Reply {
                invocation_id,
                outcome,
            };
        }
        if self.initialized == Some(1) {
            return ServerMessage::Initialized;
        }
        if self.messages.is_empty() {
            ServerMessage::KeepAlive
        } else {
            ServerMessage::Messages(self.messages)
        }
    }
}

/// Answer to the `negotiate` request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NegotiateResponse {
    pub connection_token: String,
    #[serde(default)]
    pub connection_id: Option<String>,
    /// Seconds between server keep-alive frames.
    #[serde(default)]
    pub keep_alive_timeout: Option<f64>,
    /// Seconds of silence after which the connection is considered lost.
    #[serde(default)]
    pub disconnect_timeout: Option<f64>,
    #[serde(default)]
    pub try_web_sockets: Option<bool>,
    #[serde(default)]
    pub protocol_version: Option<String>,
}

/// Answer to the `start` request.
#[derive(Debug, Clone, Deserialize)]
pub struct StartResponse {
    #[serde(rename = "Response")]
    pub response: String,
}

/// Kind of change carried by an [`OrderUpdate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OrderUpdateType {
    /// A new price level.
    Add,
    /// The price level is gone.
    Remove,
    /// The quantity at the price level changed.
    Update,
}

impl TryFrom<u8> for OrderUpdateType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OrderUpdateType::Add),
            1 => Ok(OrderUpdateType::Remove),
            2 => Ok(OrderUpdateType::Update),
            other => Err(format!("unknown order update type {other}")),
        }
    }
}

impl From<OrderUpdateType> for u8 {
    fn from(value: OrderUpdateType) -> Self {
        match value {
            OrderUpdateType::Add => 0,
            OrderUpdateType::Remove => 1,
            OrderUpdateType::Update => 2,
        }
    }
}

/// A change to one price level of the order book.
///
/// Snapshot entries carry no update type.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderUpdate {
    #[serde_as(as = "BittrexDecimal")]
    pub quantity: Decimal,
    #[serde_as(as = "BittrexDecimal")]
    pub rate: Decimal,
    #[serde(rename = "Type", default)]
    pub update_type: Option<OrderUpdateType>,
}

/// A trade fill.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Fill {
    /// Present on snapshot fills only.
    #[serde(default)]
    pub id: Option<u64>,
    pub order_type: OrderSide,
    #[serde_as(as = "BittrexDecimal")]
    pub quantity: Decimal,
    /// Snapshot fills call this `Price`.
    #[serde_as(as = "BittrexDecimal")]
    #[serde(alias = "Price")]
    pub rate: Decimal,
    #[serde_as(as = "BittrexTimestamp")]
    #[serde(rename = "TimeStamp", alias = "Timestamp")]
    pub timestamp: OffsetDateTime,
}

/// Order book changes and fills for one market.
///
/// The first value of a subscription is the full state of the market with
/// `initial` set; every later value is a delta relayed as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExchangeState {
    #[serde(default)]
    pub market_name: Option<String>,
    /// Sequence number of the delta.
    #[serde(rename = "Nounce")]
    pub nonce: u64,
    #[serde(default)]
    pub buys: Vec<OrderUpdate>,
    #[serde(default)]
    pub sells: Vec<OrderUpdate>,
    #[serde(default)]
    pub fills: Vec<Fill>,
    /// Whether this is the initial snapshot.
    #[serde(default)]
    pub initial: bool,
}
