//! Authentication module for Bittrex API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - Unix-time nonce generation
//! - HMAC-SHA512 URL signing for authenticated requests

mod credentials;
mod nonce;
mod signature;

pub use credentials::{
    API_KEY_VAR, API_SECRET_VAR, Credentials, CredentialsProvider, EnvCredentials,
    StaticCredentials,
};
pub use nonce::{FixedNonce, NonceProvider, UnixTimeNonce};
pub use signature::{SIGNATURE_HEADER, sign_url};
