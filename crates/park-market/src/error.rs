//! Error types for park-market.

use park_core::ParkError;
use thiserror::Error;

/// Result type for matching operations.
pub type Result<T> = std::result::Result<T, MarketError>;

/// Failures reported by a [`crate::ParkingStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing or reading the durable snapshot failed.
    #[error("persistence failed: {0}")]
    Persist(#[from] std::io::Error),

    /// The backing store cannot serve requests right now.
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Description of the outage.
        reason: String,
    },

    /// Transaction hooks were called out of order.
    #[error("transaction error: {reason}")]
    Transaction {
        /// Description of the misuse.
        reason: String,
    },
}

/// Errors that can occur in matching operations.
#[derive(Debug, Error)]
pub enum MarketError {
    /// An argument failed validation.
    #[error(transparent)]
    Invalid(#[from] ParkError),

    /// The data-access layer failed; no state was changed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be loaded or is inconsistent.
    #[error("invalid configuration: {reason}")]
    Config {
        /// Description of the problem.
        reason: String,
    },
}

impl MarketError {
    /// Shorthand for an invalid-argument error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(ParkError::invalid(reason))
    }
}
