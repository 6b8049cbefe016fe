//! # Bittrex Client
//!
//! An async Rust client library for the Bittrex exchange REST and push APIs.
//!
//! ## Features
//!
//! - The v1.1 REST API (public, market and account endpoints) and the
//!   undocumented v2.0 candles endpoint
//! - HMAC-SHA512 request signing
//! - Push subscriptions to order book deltas and fills
//! - Strong typing for all request/response types
//! - Financial precision with `rust_decimal`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bittrex_api_client::rest::BittrexRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BittrexRestClient::new();
//!     let ticker = client.get_ticker("BTC-LTC").await?;
//!     println!("Bid {} / Ask {}", ticker.bid, ticker.ask);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod rest;
pub mod types;
pub mod ws;

// Re-export commonly used types at crate root
pub use error::{ApiError, BittrexError};
pub use rest::BittrexRestClient;
pub use types::common::{OrderBookType, OrderSide, TickInterval};
pub use ws::{BittrexWsClient, ExchangeState, ExchangeSubscription};

/// Result type alias using BittrexError
pub type Result<T> = std::result::Result<T, BittrexError>;
