//! Bittrex push API client.
//!
//! The exchange pushes order book deltas and fills through the `CoreHub`
//! SignalR hub. [`BittrexWsClient::subscribe_exchange_updates`] opens a
//! connection, subscribes, fetches the snapshot and then relays deltas on an
//! [`ExchangeSubscription`].

pub mod client;
pub mod messages;
pub mod subscription;
pub mod transport;

pub use client::{BittrexWsClient, WsConfig, WsConfigBuilder};
pub use messages::{ExchangeState, Fill, HubMessage, OrderUpdate, OrderUpdateType};
pub use subscription::{ExchangeSubscription, SubscriptionEvent, SubscriptionHandle, SubscriptionState};
pub use transport::{HubTransport, SignalrTransport};
