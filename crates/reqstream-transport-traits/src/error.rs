//! Transport primitive error types.

use thiserror::Error;

use crate::handle::HandleId;

/// A specialized `Result` type for transport primitive operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Represents errors a transport primitive can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportError {
    /// The primitive refused to materialize a handle from the given options.
    #[error("Handle refused: {0}")]
    Refused(String),

    /// The primitive has no capacity left for another live handle.
    #[error(
        "Handle limit reached ({max} live handles). \
         If this is expected, raise the limit with \
         `PrimitiveConfig {{ max_handles: Some({}) }}` or use `PrimitiveConfig::unlimited()`",
        max * 2
    )]
    Exhausted {
        /// The configured maximum number of live handles
        max: usize,
    },

    /// The handle was not created by this primitive or has been released.
    #[error("Unknown handle: {0}")]
    UnknownHandle(HandleId),

    /// The primitive was configured with invalid parameters.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An underlying I/O error occurred.
    #[error("IO error: {0}")]
    Io(String),

    /// An unexpected internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_message_suggests_limit() {
        let err = TransportError::Exhausted { max: 4 };
        let msg = err.to_string();
        assert!(msg.contains("4 live handles"));
        assert!(msg.contains("Some(8)"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::other("disk gone");
        let err: TransportError = io.into();
        assert!(matches!(err, TransportError::Io(ref m) if m == "disk gone"));
    }
}
