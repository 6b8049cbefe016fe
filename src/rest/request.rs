//! Request signing for the Bittrex REST API.
//!
//! A signed request is a fully-qualified URL whose query already carries the
//! `nonce`, `_` and `apikey` parameters, paired with the hex HMAC-SHA512 of
//! that exact URL string.

use std::collections::BTreeMap;

use url::Url;

use crate::auth::{Credentials, sign_url};
use crate::error::BittrexError;
use crate::rest::endpoints::{API_VERSION, UNDOCUMENTED_API_VERSION};

/// Query parameters of a REST call.
///
/// A `BTreeMap` keeps the serialized query in lexicographic key order, so the
/// same inputs always produce the same URL and signature.
pub type QueryParams = BTreeMap<String, String>;

/// Pseudo-parameter routing a call to the undocumented v2.0 API.
///
/// Its presence selects the version; the value is ignored and the parameter is
/// never sent.
pub const UNDOCUMENTED_API_FLAG: &str = "useApi2";

/// A URL ready to be requested together with its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// The exact URL that was signed.
    pub url: Url,
    /// Lowercase hex HMAC-SHA512 of `url`.
    pub signature: String,
}

/// Build and sign the URL for a REST call.
///
/// `endpoint` is relative to the version segment, e.g. `"public/getmarkets"`.
/// A leading `/` is tolerated.
///
/// # Example
///
/// ```rust
/// use bittrex_api_client::auth::Credentials;
/// use bittrex_api_client::rest::{QueryParams, sign};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("key", "secret");
/// let mut params = QueryParams::new();
/// params.insert("market".into(), "BTC-LTC".into());
///
/// let request = sign("https://bittrex.com/api", "public/getticker", params, &credentials, 42)?;
/// assert_eq!(
///     request.url.as_str(),
///     "https://bittrex.com/api/v1.1/public/getticker?_=42&apikey=key&market=BTC-LTC&nonce=42"
/// );
/// # Ok(())
/// # }
/// ```
pub fn sign(
    base_url: &str,
    endpoint: &str,
    mut params: QueryParams,
    credentials: &Credentials,
    nonce: u64,
) -> Result<SignedRequest, BittrexError> {
    let version = if params.remove(UNDOCUMENTED_API_FLAG).is_some() {
        UNDOCUMENTED_API_VERSION
    } else {
        API_VERSION
    };

    let nonce = nonce.to_string();
    params.insert("nonce".to_string(), nonce.clone());
    // Cache-buster against 304 responses.
    params.insert("_".to_string(), nonce);
    params.insert("apikey".to_string(), credentials.api_key.clone());

    let query = serde_urlencoded::to_string(&params)
        .map_err(|e| BittrexError::Auth(format!("Failed to encode query: {e}")))?;

    let url = Url::parse(&format!(
        "{}/{}/{}?{}",
        base_url.trim_end_matches('/'),
        version,
        endpoint.trim_start_matches('/'),
        query
    ))?;

    let signature = sign_url(credentials, url.as_str())?;

    Ok(SignedRequest { url, signature })
}

/// Build a [`QueryParams`] map from key/value pairs.
pub(crate) fn params<const N: usize>(pairs: [(&str, String); N]) -> QueryParams {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
