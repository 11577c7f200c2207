//! Error types for the ban database.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in ban database operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] bandb_storage::StorageError),

    /// Record codec error.
    #[error("codec error: {0}")]
    Codec(#[from] bandb_codec::CodecError),

    /// I/O error outside the backing file (export targets).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backing file could not be opened or created.
    #[error("cannot open ban file {name}: {source}")]
    OpenFailed {
        /// Name of the ban file.
        name: String,
        /// Underlying storage failure.
        #[source]
        source: bandb_storage::StorageError,
    },

    /// The ban file does not exist and provisioning is disabled.
    #[error("ban file not found: {name}")]
    NotFound {
        /// Name of the ban file.
        name: String,
    },

    /// The file is not a ban file this build can read.
    #[error("invalid ban file format: {message}")]
    InvalidFormat {
        /// Description of the format issue.
        message: String,
    },

    /// The version byte names a format this build does not understand.
    #[error("unsupported ban file version {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version byte found in the file.
        found: u8,
        /// The only version this build reads and writes.
        supported: u8,
    },

    /// A record could not be decoded during load.
    #[error("corrupt record at offset {offset}: {source}")]
    CorruptRecord {
        /// File offset where the bad record starts.
        offset: u64,
        /// What the decoder tripped over.
        #[source]
        source: bandb_codec::CodecError,
    },

    /// A ban was given a negative duration.
    #[error("ban length must not be negative, got {length}")]
    NegativeLength {
        /// The rejected length in seconds.
        length: i64,
    },

    /// An earlier write failed and could not be undone; the handle must
    /// be reloaded.
    #[error("ban database {name} is in a failed state and must be reloaded")]
    DatabaseFailed {
        /// Name of the ban file.
        name: String,
    },
}

impl CoreError {
    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Returns true if the error means the file contents are damaged
    /// or unreadable by this build.
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::CorruptRecord { .. } | Self::InvalidFormat { .. } | Self::UnsupportedVersion { .. }
        )
    }
}
