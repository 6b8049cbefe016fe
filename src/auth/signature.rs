//! HMAC-SHA512 signature generation for Bittrex API authentication.
//!
//! Every REST call is signed as:
//! ```text
//! hex(HMAC-SHA512(full_url, api_secret))
//! ```
//!
//! where `full_url` is the complete request URL including the query string.
//! The signature is sent in the `apisign` header.

use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::auth::Credentials;
use crate::error::BittrexError;

type HmacSha512 = Hmac<Sha512>;

/// Name of the request header carrying the signature.
pub const SIGNATURE_HEADER: &str = "apisign";

/// Sign a fully-qualified request URL.
///
/// # Arguments
///
/// * `credentials` - API credentials containing the secret
/// * `url` - The exact URL string that will be requested
///
/// # Returns
///
/// Lowercase hex-encoded HMAC-SHA512 signature (128 characters).
///
/// # Example
///
/// ```rust
/// use bittrex_api_client::auth::{Credentials, sign_url};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("api_key", "api_secret");
/// let signature = sign_url(
///     &credentials,
///     "https://bittrex.com/api/v1.1/account/getbalances?_=1&apikey=api_key&nonce=1",
/// )?;
/// assert_eq!(signature.len(), 128);
/// # Ok(())
/// # }
/// ```
pub fn sign_url(credentials: &Credentials, url: &str) -> Result<String, BittrexError> {
    let mut hmac = HmacSha512::new_from_slice(credentials.expose_secret().as_bytes())
        .map_err(|e| BittrexError::Auth(format!("Invalid HMAC key: {e}")))?;
    hmac.update(url.as_bytes());

    Ok(hex::encode(hmac.finalize().into_bytes()))
}
