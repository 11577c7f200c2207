//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Failed to encode an entry.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// Invalid UTF-8 string.
    #[error("invalid UTF-8 in field `{field}`")]
    InvalidUtf8 {
        /// Name of the field that held the bad bytes.
        field: &'static str,
    },

    /// The record ended before all of its declared fields were read.
    #[error("unexpected end of input: needed {needed} more bytes for `{field}`")]
    UnexpectedEof {
        /// Field being read when input ran out.
        field: &'static str,
        /// Bytes still required.
        needed: usize,
    },

    /// A length prefix claims more than the codec allows.
    #[error("size limit exceeded for `{field}`: claimed {claimed}, max allowed {max_allowed}")]
    SizeLimitExceeded {
        /// Field carrying the length prefix.
        field: &'static str,
        /// The length found in the input.
        claimed: u64,
        /// The configured maximum.
        max_allowed: u64,
    },

    /// The same extension key appears twice in one record.
    #[error("duplicate var_data key `{key}`")]
    DuplicateVarKey {
        /// The repeated key.
        key: String,
    },
}

impl CodecError {
    /// Create an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }

    /// Returns true if the error means the input was cut short.
    #[must_use]
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::UnexpectedEof { .. })
    }
}
