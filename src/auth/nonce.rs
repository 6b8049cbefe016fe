//! Nonce generation for Bittrex API authentication.
//!
//! Bittrex expects the current Unix time in seconds as the `nonce` query
//! parameter. The same value doubles as the cache-busting `_` parameter.

use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for providing nonces for signed requests.
pub trait NonceProvider: Send + Sync {
    /// Generate the nonce for the next request.
    fn next_nonce(&self) -> u64;
}

/// Nonce provider returning the current Unix time in seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixTimeNonce;

impl UnixTimeNonce {
    /// Create a new time-based nonce provider.
    pub fn new() -> Self {
        Self
    }
}

impl NonceProvider for UnixTimeNonce {
    fn next_nonce(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Nonce provider that always returns the same value.
///
/// Useful to make signatures reproducible.
#[derive(Debug, Clone, Copy)]
pub struct FixedNonce(pub u64);

impl NonceProvider for FixedNonce {
    fn next_nonce(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_nonce_is_seconds() {
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let nonce = UnixTimeNonce::new().next_nonce();
        let after = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        assert!(nonce >= before && nonce <= after);
    }

    #[test]
    fn test_unix_nonce_non_decreasing() {
        let provider = UnixTimeNonce::new();
        let mut last = 0u64;
        for _ in 0..100 {
            let nonce = provider.next_nonce();
            assert!(nonce >= last);
            last = nonce;
        }
    }

    #[test]
    fn test_fixed_nonce() {
        let provider = FixedNonce(1513971138);
        assert_eq!(provider.next_nonce(), 1513971138);
        assert_eq!(provider.next_nonce(), 1513971138);
    }
}
