//! Bittrex REST API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::{
    CredentialsProvider, NonceProvider, SIGNATURE_HEADER, StaticCredentials, UnixTimeNonce,
};
use crate::error::BittrexError;
use crate::rest::endpoints::{BITTREX_BASE_URL, DEFAULT_TIMEOUT};
use crate::rest::envelope::{Envelope, excerpt, normalize};
use crate::rest::request::{QueryParams, SignedRequest, sign};

/// The Bittrex REST API client.
///
/// Every call goes through one pipeline: sign the URL, issue a GET with the
/// signature in the `apisign` header, race the response against the
/// configured timeout, then decode the envelope. The client keeps no per-call
/// state, so clones can be shared freely between tasks.
///
/// # Example
///
/// ```rust,no_run
/// use bittrex_api_client::rest::BittrexRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Create a client for public endpoints only
///     let client = BittrexRestClient::new();
///
///     let ticker = client.get_ticker("BTC-LTC").await?;
///     println!("Ticker: {:?}", ticker);
///
///     Ok(())
/// }
/// ```
///
/// For private endpoints, provide credentials:
///
/// ```rust,no_run
/// use bittrex_api_client::auth::StaticCredentials;
/// use bittrex_api_client::rest::BittrexRestClient;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let credentials = Arc::new(StaticCredentials::new("api_key", "api_secret"));
///     let client = BittrexRestClient::builder()
///         .credentials(credentials)
///         .build();
///
///     let balances = client.get_balances().await?;
///     println!("Balances: {:?}", balances);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct BittrexRestClient {
    http_client: ClientWithMiddleware,
    base_url: String,
    credentials: Arc<dyn CredentialsProvider>,
    nonce_provider: Arc<dyn NonceProvider>,
    timeout: Duration,
}

impl BittrexRestClient {
    /// Create a new client with default settings.
    ///
    /// This client can only access public endpoints.
    /// Use [`BittrexRestClient::builder()`] to configure credentials for private endpoints.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> BittrexRestClientBuilder {
        BittrexRestClientBuilder::new()
    }

    /// The configured per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether private endpoints can be called.
    pub fn has_credentials(&self) -> bool {
        !self.credentials.get_credentials().is_anonymous()
    }

    /// Sign and send a request, returning the parsed envelope.
    ///
    /// The envelope is returned even when `success` is false; use
    /// [`Envelope::into_result`] or [`BittrexRestClient::call`] to apply
    /// success semantics.
    pub async fn send(&self, endpoint: &str, params: QueryParams) -> Result<Envelope, BittrexError> {
        let nonce = self.nonce_provider.next_nonce();
        let request = sign(
            &self.base_url,
            endpoint,
            params,
            self.credentials.get_credentials(),
            nonce,
        )?;

        debug!(endpoint, nonce, "Sending Bittrex REST request");

        let (status, body) = tokio::time::timeout(self.timeout, self.fetch(request))
            .await
            .map_err(|_| {
                warn!(endpoint, timeout = ?self.timeout, "Bittrex REST request timed out");
                BittrexError::Timeout(self.timeout)
            })??;

        debug!(endpoint, %status, bytes = body.len(), "Received Bittrex REST response");

        normalize(&body, endpoint).map_err(|err| match err {
            BittrexError::MalformedEnvelope(reason) if !status.is_success() => {
                BittrexError::MalformedEnvelope(format!("HTTP {status}: {reason}"))
            }
            other => other,
        })
    }

    /// Send a request and decode a successful envelope's `result`.
    pub async fn call<T>(&self, endpoint: &str, params: QueryParams) -> Result<T, BittrexError>
    where
        T: DeserializeOwned,
    {
        let envelope = self.send(endpoint, params).await?;
        if !envelope.success {
            warn!(endpoint, message = %envelope.message, "Bittrex API rejected request");
        }
        envelope.into_result()
    }

    /// Like [`BittrexRestClient::call`], but refuses to run without credentials.
    pub(crate) async fn private_call<T>(
        &self,
        endpoint: &str,
        params: QueryParams,
    ) -> Result<T, BittrexError>
    where
        T: DeserializeOwned,
    {
        if !self.has_credentials() {
            return Err(BittrexError::MissingCredentials);
        }
        self.call(endpoint, params).await
    }

    /// Issue the GET and read the full body.
    async fn fetch(&self, request: SignedRequest) -> Result<(StatusCode, Vec<u8>), BittrexError> {
        let response = self
            .http_client
            .get(request.url)
            .header(SIGNATURE_HEADER, request.signature)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            debug!(%status, body = %excerpt(&body), "Non-success HTTP status from Bittrex");
        }

        Ok((status, body.to_vec()))
    }
}

impl Default for BittrexRestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BittrexRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BittrexRestClient")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.has_credentials())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for [`BittrexRestClient`].
pub struct BittrexRestClientBuilder {
    base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    nonce_provider: Option<Arc<dyn NonceProvider>>,
    user_agent: Option<String>,
    timeout: Duration,
}

impl BittrexRestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: BITTREX_BASE_URL.to_string(),
            credentials: None,
            nonce_provider: None,
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the base URL, without the version segment (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the credentials provider for authenticated requests.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set a custom nonce provider.
    pub fn nonce_provider(mut self, provider: Arc<dyn NonceProvider>) -> Self {
        self.nonce_provider = Some(provider);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the time budget for one call, covering the send and the full body read.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> BittrexRestClient {
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("bittrex-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("bittrex-api-client"));
        headers.insert(USER_AGENT, header_value);

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        // Failed calls are never retried: trading endpoints are not idempotent.
        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        let credentials = self
            .credentials
            .unwrap_or_else(|| Arc::new(StaticCredentials::new("", "")));
        let nonce_provider = self
            .nonce_provider
            .unwrap_or_else(|| Arc::new(UnixTimeNonce::new()));

        BittrexRestClient {
            http_client: client,
            base_url: self.base_url,
            credentials,
            nonce_provider,
            timeout: self.timeout,
        }
    }
}

impl Default for BittrexRestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
