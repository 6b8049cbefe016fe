//! Error types for the Bittrex client library.

use std::time::Duration;

use thiserror::Error;

/// The main error type for all Bittrex client operations.
#[derive(Error, Debug)]
pub enum BittrexError {
    /// A numeric token did not have the shape of a decimal number.
    #[error("Malformed number: {0:?}")]
    MalformedNumber(String),

    /// A timestamp token did not match `YYYY-MM-DDTHH:MM:SS[.fraction]`.
    #[error("Malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    /// Connection, DNS or TLS failure while talking to the REST API
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    /// No response within the configured request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The API answered with a zero-length body.
    #[error("Empty response body from endpoint {endpoint}")]
    EmptyBody {
        /// Endpoint that produced the empty body
        endpoint: String,
    },

    /// The body is not a `{success, message, result}` envelope.
    #[error("Malformed response envelope: {0}")]
    MalformedEnvelope(String),

    /// The envelope parsed with `success: false`.
    #[error("Bittrex API rejected request: {0}")]
    ApiRejected(ApiError),

    /// The envelope succeeded but `result` does not match the expected record shape.
    #[error("Malformed result payload: {0}")]
    MalformedResult(String),

    /// Private endpoint called without credentials
    #[error("Missing credentials: API key and secret required for private endpoints")]
    MissingCredentials,

    /// Signing failure
    #[error("Authentication error: {0}")]
    Auth(String),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket protocol error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The push connection could not be established within the connect timeout.
    #[error("Push connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// The push connection handshake failed.
    #[error("Push connection failed: {0}")]
    ConnectFailed(String),

    /// The hub answered an invocation with an error.
    #[error("Hub invocation failed: {0}")]
    HubError(String),

    /// The hub rejected or did not answer the subscribe call.
    #[error("Subscribe call failed: {0}")]
    SubscribeError(String),

    /// The hub rejected or did not answer the state query.
    #[error("Exchange state query failed: {0}")]
    QueryError(String),

    /// A single pushed message could not be decoded. Not fatal to the subscription.
    #[error("Failed to decode {method} message from hub {hub}: {reason} (payload: {payload})")]
    MessageDecode {
        /// Hub that delivered the message
        hub: String,
        /// Client method the message was addressed to
        method: String,
        /// Raw payload, as received
        payload: String,
        /// Decoder error
        reason: String,
    },

    /// The push connection was closed or lost.
    #[error("Push connection closed by remote host: {reason}")]
    RemoteDisconnect {
        /// Reason for the closure
        reason: String,
    },
}

impl From<reqwest::Error> for BittrexError {
    fn from(err: reqwest::Error) -> Self {
        BittrexError::Transport(reqwest_middleware::Error::Reqwest(err))
    }
}

impl BittrexError {
    /// Whether this error ends a push subscription.
    ///
    /// Only per-message decode failures leave the stream running.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BittrexError::MessageDecode { .. })
    }
}

/// A rejection reported by the Bittrex API in the response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The `message` field, verbatim (e.g. "INSUFFICIENT_FUNDS")
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl ApiError {
    /// Create a new API error from the envelope message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Check if the account lacks funds for the request.
    pub fn is_insufficient_funds(&self) -> bool {
        self.message == error_codes::INSUFFICIENT_FUNDS
    }

    /// Check if the market name is unknown.
    pub fn is_invalid_market(&self) -> bool {
        self.message == error_codes::INVALID_MARKET
    }

    /// Check if the API key was refused.
    pub fn is_invalid_key(&self) -> bool {
        matches!(
            self.message.as_str(),
            error_codes::APIKEY_INVALID | error_codes::APIKEY_NOT_PROVIDED
        )
    }

    /// Check if the request signature was refused.
    pub fn is_invalid_signature(&self) -> bool {
        self.message == error_codes::INVALID_SIGNATURE
    }

    /// Check if the API key lacks the permission for this endpoint.
    pub fn is_permission_denied(&self) -> bool {
        self.message == error_codes::INVALID_PERMISSION
    }
}

/// Known Bittrex envelope messages.
pub mod error_codes {
    pub const INSUFFICIENT_FUNDS: &str = "INSUFFICIENT_FUNDS";
    pub const INVALID_MARKET: &str = "INVALID_MARKET";
    pub const MIN_TRADE_REQUIREMENT_NOT_MET: &str = "MIN_TRADE_REQUIREMENT_NOT_MET";
    pub const ORDER_NOT_OPEN: &str = "ORDER_NOT_OPEN";
    pub const INVALID_ORDER: &str = "INVALID_ORDER";
    pub const UUID_INVALID: &str = "UUID_INVALID";
    pub const RATE_NOT_PROVIDED: &str = "RATE_NOT_PROVIDED";
    pub const QUANTITY_NOT_PROVIDED: &str = "QUANTITY_NOT_PROVIDED";

    pub const APIKEY_INVALID: &str = "APIKEY_INVALID";
    pub const APIKEY_NOT_PROVIDED: &str = "APIKEY_NOT_PROVIDED";
    pub const INVALID_SIGNATURE: &str = "INVALID_SIGNATURE";
    pub const NONCE_NOT_PROVIDED: &str = "NONCE_NOT_PROVIDED";
    pub const INVALID_PERMISSION: &str = "INVALID_PERMISSION";

    pub const INVALID_CURRENCY: &str = "INVALID_CURRENCY";
    pub const ADDRESS_GENERATING: &str = "ADDRESS_GENERATING";
}
