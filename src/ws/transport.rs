//! Hub transport for the Bittrex push API.
//!
//! The exchange pushes data through a classic SignalR hub. Establishing a
//! connection takes three steps:
//!
//! 1. `GET {base}/negotiate` returns a connection token and timeouts
//! 2. a WebSocket is opened on `{socket}/connect` and the server confirms with an init frame
//! 3. `GET {base}/start` activates the connection
//!
//! After that the client invokes hub methods with `{"H","M","A","I"}` frames
//! and receives replies (`{"I","R"}` / `{"I","E"}`), pushed messages
//! (`{"C","M":[...]}`) and keep-alives (`{}`) on the same socket.

use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::BittrexError;
use crate::rest::excerpt;
use crate::ws::client::WsConfig;
use crate::ws::messages::{
    CLIENT_PROTOCOL, HubInvocation, HubMessage, NegotiateResponse, ServerFrame, ServerMessage,
    StartResponse,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Silence tolerated when the server does not announce a disconnect timeout.
const DEFAULT_DISCONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// A connection to a push hub.
///
/// The subscription engine drives a transport through this trait, so tests
/// can substitute a scripted implementation for the network one.
pub trait HubTransport: Send + 'static {
    /// Open the connection and make it ready for invocations.
    fn connect(&mut self) -> impl Future<Output = Result<(), BittrexError>> + Send;

    /// Invoke a hub method and wait for its result.
    ///
    /// Messages pushed while waiting must be kept and returned by later
    /// [`HubTransport::next_event`] calls, in arrival order.
    fn invoke(
        &mut self,
        method: &str,
        args: Vec<Value>,
    ) -> impl Future<Output = Result<Value, BittrexError>> + Send;

    /// Wait for the next pushed message.
    ///
    /// Returns `Ok(None)` once the connection was closed cleanly.
    fn next_event(&mut self) -> impl Future<Output = Result<Option<HubMessage>, BittrexError>> + Send;

    /// Close the connection.
    fn close(&mut self) -> impl Future<Output = Result<(), BittrexError>> + Send;
}

/// [`HubTransport`] speaking the SignalR hub protocol over a WebSocket.
pub struct SignalrTransport {
    config: WsConfig,
    http_client: ClientWithMiddleware,
    socket: Option<WsStream>,
    connection_token: Option<String>,
    disconnect_timeout: Duration,
    next_invocation_id: u64,
    pending: VecDeque<HubMessage>,
}

impl std::fmt::Debug for SignalrTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalrTransport")
            .field("signalr_url", &self.config.signalr_url)
            .field("hub", &self.config.hub)
            .field("connected", &self.socket.is_some())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl SignalrTransport {
    /// Create an unconnected transport.
    pub fn new(config: WsConfig) -> Self {
        let http_client = ClientBuilder::new(reqwest::Client::new())
            .with(TracingMiddleware::default())
            .build();

        Self {
            config,
            http_client,
            socket: None,
            connection_token: None,
            disconnect_timeout: DEFAULT_DISCONNECT_TIMEOUT,
            next_invocation_id: 0,
            pending: VecDeque::new(),
        }
    }

    /// `connectionData` query value naming the hub.
    fn connection_data(&self) -> String {
        serde_json::json!([{ "name": self.config.hub.to_lowercase() }]).to_string()
    }

    /// Build `{base}/{action}` with the protocol query parameters.
    fn endpoint_url(&self, base: &str, action: &str, with_transport: bool) -> Result<Url, BittrexError> {
        let mut url = Url::parse(&format!("{}/{}", base.trim_end_matches('/'), action))?;
        {
            let mut query = url.query_pairs_mut();
            if with_transport {
                query.append_pair("transport", "webSockets");
            }
            query.append_pair("clientProtocol", CLIENT_PROTOCOL);
            if let Some(token) = &self.connection_token {
                query.append_pair("connectionToken", token);
            }
            query.append_pair("connectionData", &self.connection_data());
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, BittrexError> {
        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(BittrexError::ConnectFailed(format!(
                "HTTP {status}: {}",
                excerpt(&body)
            )));
        }
        serde_json::from_slice(&body).map_err(|e| {
            BittrexError::ConnectFailed(format!("{e}; body: {}", excerpt(&body)))
        })
    }

    /// Read the next text frame, enforcing the disconnect timeout.
    ///
    /// Returns `Ok(None)` when the socket was closed.
    async fn read_frame(&mut self) -> Result<Option<ServerMessage>, BittrexError> {
        let disconnect_timeout = self.disconnect_timeout;
        let socket = self.socket.as_mut().ok_or_else(|| BittrexError::RemoteDisconnect {
            reason: "not connected".to_string(),
        })?;

        loop {
            let next = tokio::time::timeout(disconnect_timeout, socket.next())
                .await
                .map_err(|_| BittrexError::RemoteDisconnect {
                    reason: format!("no frame received for {disconnect_timeout:?}"),
                })?;

            let text = match next {
                None => return Ok(None),
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(WsMessage::Text(text))) => text.to_string(),
                Some(Ok(WsMessage::Binary(bytes))) => match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Dropping binary push frame that is not UTF-8: {}", e);
                        continue;
                    }
                },
                Some(Ok(WsMessage::Close(frame))) => {
                    debug!(?frame, "Push socket closed by server");
                    return Ok(None);
                }
                Some(Ok(_)) => continue,
            };

            match ServerFrame::parse(&text) {
                Ok(frame) => return Ok(Some(frame.classify())),
                Err(e) => {
                    warn!("Failed to parse push frame: {}", e);
                    trace!(%text, "Unparseable push frame");
                }
            }
        }
    }

    /// Queue pushed messages for [`HubTransport::next_event`].
    fn buffer(&mut self, messages: Vec<HubMessage>) {
        self.pending.extend(messages);
    }
}

/// Silence limit for an announced `DisconnectTimeout` in seconds.
///
/// Missing, non-positive and unrepresentable values fall back to the default.
fn disconnect_timeout_from(announced: Option<f64>) -> Duration {
    let Some(seconds) = announced else {
        return DEFAULT_DISCONNECT_TIMEOUT;
    };
    match Duration::try_from_secs_f64(seconds) {
        Ok(limit) if !limit.is_zero() => limit,
        _ => {
            warn!(seconds, "Ignoring unusable disconnect timeout");
            DEFAULT_DISCONNECT_TIMEOUT
        }
    }
}

impl HubTransport for SignalrTransport {
    async fn connect(&mut self) -> Result<(), BittrexError> {
        self.connection_token = None;

        let negotiate_url = self.endpoint_url(&self.config.signalr_url, "negotiate", false)?;
        debug!(url = %negotiate_url, "Negotiating push connection");
        let negotiate: NegotiateResponse = self.get_json(negotiate_url).await?;

        if negotiate.try_web_sockets == Some(false) {
            return Err(BittrexError::ConnectFailed(
                "server does not accept WebSocket connections".to_string(),
            ));
        }
        self.disconnect_timeout = disconnect_timeout_from(negotiate.disconnect_timeout);
        self.connection_token = Some(negotiate.connection_token);

        let connect_url = self.endpoint_url(&self.config.socket_url, "connect", true)?;
        let (socket, _) = connect_async(connect_url.as_str())
            .await
            .map_err(|e| BittrexError::ConnectFailed(format!("WebSocket handshake failed: {e}")))?;
        self.socket = Some(socket);

        loop {
            match self.read_frame().await? {
                Some(ServerMessage::Initialized) => break,
                Some(ServerMessage::Messages(messages)) => self.buffer(messages),
                Some(_) => {}
                None => {
                    return Err(BittrexError::ConnectFailed(
                        "socket closed before initialization".to_string(),
                    ));
                }
            }
        }

        let start_url = self.endpoint_url(&self.config.signalr_url, "start", true)?;
        let start: StartResponse = self.get_json(start_url).await?;
        if start.response != "started" {
            return Err(BittrexError::ConnectFailed(format!(
                "unexpected start response {:?}",
                start.response
            )));
        }

        debug!(hub = %self.config.hub, "Push connection started");
        Ok(())
    }

    async fn invoke(&mut self, method: &str, args: Vec<Value>) -> Result<Value, BittrexError> {
        let invocation_id = self.next_invocation_id;
        self.next_invocation_id += 1;

        let frame = serde_json::to_string(&HubInvocation {
            hub: &self.config.hub,
            method,
            args: &args,
            invocation_id,
        })?;

        let socket = self.socket.as_mut().ok_or_else(|| BittrexError::RemoteDisconnect {
            reason: "not connected".to_string(),
        })?;
        trace!(%frame, "Invoking hub method");
        socket.send(WsMessage::Text(frame.into())).await?;

        loop {
            match self.read_frame().await? {
                Some(ServerMessage::Reply {
                    invocation_id: id,
                    outcome,
                }) if id == invocation_id => {
                    return outcome.map_err(BittrexError::HubError);
                }
                Some(ServerMessage::Reply { invocation_id: id, .. }) => {
                    trace!(id, "Ignoring reply to another invocation");
                }
                Some(ServerMessage::Messages(messages)) => self.buffer(messages),
                Some(_) => {}
                None => {
                    return Err(BittrexError::RemoteDisconnect {
                        reason: format!("socket closed while waiting for {method}"),
                    });
                }
            }
        }
    }

    async fn next_event(&mut self) -> Result<Option<HubMessage>, BittrexError> {
        loop {
            if let Some(message) = self.pending.pop_front() {
                return Ok(Some(message));
            }

            match self.read_frame().await? {
                Some(ServerMessage::Messages(messages)) => self.buffer(messages),
                Some(_) => {}
                None => return Ok(None),
            }
        }
    }

    async fn close(&mut self) -> Result<(), BittrexError> {
        self.pending.clear();
        if let Some(mut socket) = self.socket.take() {
            socket.close(None).await?;
        }
        Ok(())
    }
}
