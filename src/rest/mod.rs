//! Bittrex REST API client.
//!
//! All endpoint wrappers share one pipeline: [`sign`] builds the URL and its
//! signature, [`BittrexRestClient::send`] performs the GET under a timeout,
//! and [`normalize`] / [`Envelope::into_result`] turn the body into either a
//! typed result or a classified [`BittrexError`](crate::error::BittrexError).
//!
//! Endpoints are grouped as the exchange groups them:
//! - [`public`]: market data, no credentials needed
//! - [`market`]: order placement and cancellation
//! - [`account`]: balances, orders, deposits and withdrawals
//! - [`undocumented`]: the v2.0 API (candles)

mod client;
mod endpoints;
mod envelope;
mod request;

pub mod account;
pub mod market;
pub mod public;
pub mod undocumented;

pub use client::{BittrexRestClient, BittrexRestClientBuilder};
pub use endpoints::{API_VERSION, BITTREX_BASE_URL, DEFAULT_TIMEOUT, UNDOCUMENTED_API_VERSION};
pub use envelope::{Envelope, normalize};
pub(crate) use envelope::excerpt;
pub use request::{QueryParams, SignedRequest, UNDOCUMENTED_API_FLAG, sign};
