//! Common types used across the Bittrex client library.

pub mod common;
pub mod serde_helpers;

pub use common::*;
