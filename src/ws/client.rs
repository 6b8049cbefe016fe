//! Push API client and its configuration.

use std::time::Duration;

use crate::ws::messages::CORE_HUB;
use crate::ws::subscription::ExchangeSubscription;
use crate::ws::transport::{HubTransport, SignalrTransport};

/// Push API endpoint URLs.
pub mod endpoints {
    /// Base URL of the negotiate and start requests.
    pub const SIGNALR_URL: &str = "https://socket.bittrex.com/signalr";
    /// Base URL of the WebSocket connection.
    pub const SOCKET_URL: &str = "wss://socket.bittrex.com/signalr";
}

/// Configuration for push subscriptions.
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// Base URL for `negotiate` and `start`.
    pub signalr_url: String,
    /// Base URL for the WebSocket `connect`.
    pub socket_url: String,
    /// Hub to invoke.
    pub hub: String,
    /// Time allowed to establish the connection.
    pub connect_timeout: Duration,
    /// Time allowed for each hub invocation.
    pub call_timeout: Duration,
    /// Time allowed to close the connection after cancellation or failure.
    pub close_grace: Duration,
    /// Capacity of the update and error channels.
    pub channel_capacity: usize,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            signalr_url: endpoints::SIGNALR_URL.to_string(),
            socket_url: endpoints::SOCKET_URL.to_string(),
            hub: CORE_HUB.to_string(),
            connect_timeout: Duration::from_secs(15),
            call_timeout: Duration::from_secs(15),
            close_grace: Duration::from_secs(2),
            channel_capacity: 100,
        }
    }
}

impl WsConfig {
    /// Create a new configuration builder.
    pub fn builder() -> WsConfigBuilder {
        WsConfigBuilder::new()
    }
}

/// Builder for [`WsConfig`].
#[derive(Debug, Clone, Default)]
pub struct WsConfigBuilder {
    config: WsConfig,
}

impl WsConfigBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: WsConfig::default(),
        }
    }

    /// Set both base URLs.
    pub fn urls(mut self, signalr_url: impl Into<String>, socket_url: impl Into<String>) -> Self {
        self.config.signalr_url = signalr_url.into();
        self.config.socket_url = socket_url.into();
        self
    }

    /// Set the hub name.
    pub fn hub(mut self, hub: impl Into<String>) -> Self {
        self.config.hub = hub.into();
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the timeout of the subscribe and query calls.
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.config.call_timeout = timeout;
        self
    }

    /// Set the close grace period.
    pub fn close_grace(mut self, grace: Duration) -> Self {
        self.config.close_grace = grace;
        self
    }

    /// Set the channel capacity. Zero is raised to one.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity.max(1);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> WsConfig {
        self.config
    }
}

/// Bittrex push API client.
///
/// Each subscription opens its own connection and runs on its own task.
#[derive(Debug, Clone, Default)]
pub struct BittrexWsClient {
    config: WsConfig,
}

impl BittrexWsClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self::with_config(WsConfig::default())
    }

    /// Create a new client with custom configuration.
    pub fn with_config(config: WsConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &WsConfig {
        &self.config
    }

    /// Subscribe to order book deltas and fills.
    ///
    /// With a market name only that market's updates are delivered; with
    /// `None` every market is. The first update is always the snapshot.
    /// Must be called within a tokio runtime.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bittrex_api_client::ws::BittrexWsClient;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let client = BittrexWsClient::new();
    ///     let mut subscription = client.subscribe_exchange_updates(Some("BTC-ETH"));
    ///
    ///     while let Some(update) = subscription.next_update().await {
    ///         println!("nonce {}: {} buys, {} sells", update.nonce, update.buys.len(), update.sells.len());
    ///     }
    ///     while let Some(error) = subscription.next_error().await {
    ///         eprintln!("{error}");
    ///     }
    /// }
    /// ```
    pub fn subscribe_exchange_updates(&self, market: Option<&str>) -> ExchangeSubscription {
        let transport = SignalrTransport::new(self.config.clone());
        self.subscribe_with_transport(transport, market)
    }

    /// Subscribe over a caller-supplied transport.
    pub fn subscribe_with_transport<T: HubTransport>(
        &self,
        transport: T,
        market: Option<&str>,
    ) -> ExchangeSubscription {
        ExchangeSubscription::spawn(transport, market.map(str::to_string), &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WsConfig::default();
        assert_eq!(config.hub, "CoreHub");
        assert_eq!(config.socket_url, "wss://socket.bittrex.com/signalr");
        assert_eq!(config.channel_capacity, 100);
    }

    #[test]
    fn test_builder() {
        let config = WsConfig::builder()
            .urls("http://127.0.0.1:1/signalr", "ws://127.0.0.1:1/signalr")
            .call_timeout(Duration::from_millis(250))
            .close_grace(Duration::from_millis(50))
            .channel_capacity(0)
            .build();

        assert_eq!(config.signalr_url, "http://127.0.0.1:1/signalr");
        assert_eq!(config.call_timeout, Duration::from_millis(250));
        assert_eq!(config.close_grace, Duration::from_millis(50));
        assert_eq!(config.channel_capacity, 1);
        assert_eq!(config.connect_timeout, Duration::from_secs(15));
    }
}
