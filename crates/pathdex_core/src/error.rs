//! Error types for pathdex core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in pathdex core operations.
///
/// Lookups never fail: an unknown path, an unknown value or an out of
/// range handle is an empty result. Only malformed arguments are
/// rejected.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Document encoding error.
    #[error("codec error: {0}")]
    Codec(#[from] pathdex_codec::CodecError),

    /// Malformed call argument.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of what was rejected.
        message: String,
    },

    /// The arena ran out of handle space.
    #[error("handle space exhausted: more than {max} entities")]
    HandleOverflow {
        /// Largest number of entities a single index can hold.
        max: u64,
    },

    /// An index registered for a type held a different entity type.
    #[error("index type mismatch for {type_name}")]
    TypeMismatch {
        /// Rust type name that was requested.
        type_name: &'static str,
    },
}

impl CoreError {
    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(type_name: &'static str) -> Self {
        Self::TypeMismatch { type_name }
    }
}
