//! Error types for the product caching layer
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Store Error Enum ==
/// Unified error type for the caching layer.
///
/// The enum is `Clone` so a single fetch failure can be delivered to every
/// coalesced waiter on the same key, not just the caller that issued the
/// network request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The request could not be sent or completed at the transport level
    /// (offline, DNS failure, connection timeout)
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success HTTP status
    #[error("unexpected status {status} from {url}")]
    Fetch { status: u16, url: String },

    /// The response body was not valid JSON of the expected shape
    #[error("malformed response body: {0}")]
    Parse(String),

    /// The fetch owning a key was dropped before it produced a result,
    /// observed by waiters coalesced onto that key
    #[error("fetch for '{0}' was abandoned before completing")]
    Aborted(String),

    /// Internal invariant breakage
    #[error("internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Classifies a reqwest error into the transport/parse taxonomy.
    ///
    /// Body decoding failures surface as `Parse`; everything else that
    /// reqwest reports (connect, timeout, redirect loops) is `Network`.
    pub fn from_request(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Parse(err.to_string())
        } else {
            StoreError::Network(err.to_string())
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching layer.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::Fetch {
            status: 404,
            url: "http://localhost/api/products/p9".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unexpected status 404 from http://localhost/api/products/p9"
        );
    }

    #[test]
    fn test_error_is_cloneable() {
        let err = StoreError::Parse("expected value at line 1".to_string());
        let copy = err.clone();
        assert_eq!(err, copy);
    }

    #[test]
    fn test_aborted_names_the_key() {
        let err = StoreError::Aborted("product_p1".to_string());
        assert!(err.to_string().contains("product_p1"));
    }
}
