//! Error types for park-core.

use thiserror::Error;

/// Result type for park-core operations.
pub type Result<T> = std::result::Result<T, ParkError>;

/// Errors raised while constructing parking primitives.
///
/// These are programmer errors (bad input to a constructor), never business
/// outcomes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParkError {
    /// A constructor received an argument it cannot accept.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Description of what was wrong with the argument.
        reason: String,
    },
}

impl ParkError {
    /// Shorthand for building an [`ParkError::InvalidArgument`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_invalid_argument() {
        let err = ParkError::invalid("zone 'nosuch' not one of the zones");
        assert_eq!(
            err.to_string(),
            "invalid argument: zone 'nosuch' not one of the zones"
        );
    }

    #[test]
    fn error_clone_and_eq() {
        let err1 = ParkError::invalid("empty email");
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
