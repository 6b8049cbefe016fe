//! Response envelope handling.
//!
//! Every Bittrex REST response has the shape
//! `{"success": bool, "message": string, "result": any}`. The exchange answers
//! with HTTP 200 for most failures, so the envelope is the only reliable
//! source of truth.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_with::{DefaultOnNull, serde_as};

use crate::error::{ApiError, BittrexError};

/// Longest body excerpt quoted in error messages.
const BODY_EXCERPT_CHARS: usize = 256;

/// A parsed response envelope.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope {
    /// Whether the API accepted the request.
    pub success: bool,
    /// Error code or human message; usually empty on success.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub message: String,
    /// Endpoint-specific payload, `Null` when absent.
    #[serde(default)]
    pub result: Value,
}

impl Envelope {
    /// Apply success semantics and decode the payload.
    ///
    /// Returns [`BittrexError::ApiRejected`] with the message verbatim when
    /// `success` is false, and [`BittrexError::MalformedResult`] when the
    /// payload does not have the expected shape.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T, BittrexError> {
        if !self.success {
            return Err(BittrexError::ApiRejected(ApiError::new(self.message)));
        }
        T::deserialize(self.result).map_err(|e| BittrexError::MalformedResult(e.to_string()))
    }
}

/// Parse a raw response body into an [`Envelope`].
///
/// An envelope with `success: false` is still a successful parse; callers
/// decide what to do with it through [`Envelope::into_result`].
///
/// # Example
///
/// ```rust
/// use bittrex_api_client::rest::normalize;
///
/// let envelope = normalize(br#"{"success":false,"message":"INVALID_MARKET","result":null}"#, "public/getticker").unwrap();
/// assert!(!envelope.success);
/// assert_eq!(envelope.message, "INVALID_MARKET");
///
/// assert!(normalize(b"", "public/getticker").is_err());
/// ```
pub fn normalize(body: &[u8], endpoint: &str) -> Result<Envelope, BittrexError> {
    if body.trim_ascii().is_empty() {
        return Err(BittrexError::EmptyBody {
            endpoint: endpoint.to_string(),
        });
    }

    serde_json::from_slice(body).map_err(|e| {
        BittrexError::MalformedEnvelope(format!("{e}; body: {}", excerpt(body)))
    })
}

/// Lossy, length-capped rendering of a body for error messages.
pub(crate) fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut out: String = text.chars().take(BODY_EXCERPT_CHARS).collect();
    if text.chars().count() > BODY_EXCERPT_CHARS {
        out.push_str("...");
    }
    out
}
