//! Error types for the chain driver.

use thiserror::Error;

/// Errors that can occur when talking to the external ledger.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The underlying HTTP request failed (connection refused, DNS, TLS).
    #[error("chain request failed: {0}")]
    Request(String),

    /// The chain endpoint returned a non-success status.
    #[error("chain endpoint returned {status}: {body}")]
    BadStatus {
        /// The HTTP status code returned.
        status: u16,
        /// The response body, for operator diagnosis.
        body: String,
    },

    /// The response body could not be parsed into the expected shape.
    #[error("chain response parse error: {0}")]
    Parse(String),

    /// The call did not complete within its bounded timeout (§5 cancellation
    /// & timeouts).
    #[error("chain call timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// A write was attempted against an address with insufficient balance.
    #[error("insufficient balance: {address} holds {available}, needs {requested}")]
    InsufficientBalance {
        /// The wallet address.
        address: String,
        /// The amount available.
        available: u64,
        /// The amount requested.
        requested: u64,
    },
}
