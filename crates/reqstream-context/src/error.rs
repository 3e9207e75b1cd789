//! Context and validation error types.

use thiserror::Error;

use reqstream_transport_traits::{OptionValue, TransportError};

use crate::schema::ValueKind;

/// A specialized `Result` type for transport context operations.
pub type ContextResult<T> = std::result::Result<T, ContextError>;

/// Reasons an option map fails validation against a wrapper schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The wrapper name is not present in the schema registry.
    #[error("Can't validate wrapper options. Undefined wrapper: {protocol}")]
    UnknownProtocol {
        /// The wrapper name that was looked up
        protocol: String,
    },

    /// The option key is not declared for the wrapper.
    #[error("Undefined key for context. Wrapper: {protocol}, key: {key}")]
    UnknownOption {
        /// The wrapper name
        protocol: String,
        /// The rejected option key
        key: String,
    },

    /// The value does not satisfy the declared kind of its key.
    #[error(
        "Can't use {} value `{actual}` in key {key} of wrapper {protocol}. This key must be {expected}.",
        actual.type_name()
    )]
    InvalidValue {
        /// The wrapper name
        protocol: String,
        /// The option key
        key: String,
        /// The kind declared by the schema
        expected: ValueKind,
        /// The value that was supplied
        actual: OptionValue,
    },
}

impl ValidationError {
    /// The wrapper name the failure refers to.
    pub fn protocol(&self) -> &str {
        match self {
            Self::UnknownProtocol { protocol }
            | Self::UnknownOption { protocol, .. }
            | Self::InvalidValue { protocol, .. } => protocol,
        }
    }
}

/// Represents errors that can occur while configuring a transport context.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ContextError {
    /// An option map failed schema validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The call was made with a malformed argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The transport primitive refused to materialize a handle.
    #[error("Can't create transport handle: {0}")]
    CreationFailed(#[source] TransportError),
}

impl ContextError {
    /// Creates an [`ContextError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Returns the validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_message() {
        let err = ValidationError::InvalidValue {
            protocol: "http".to_string(),
            key: "max_redirects".to_string(),
            expected: ValueKind::Int,
            actual: OptionValue::from("many"),
        };
        assert_eq!(
            err.to_string(),
            "Can't use string value `many` in key max_redirects of wrapper http. This key must be integer."
        );
        assert_eq!(err.protocol(), "http");
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: ContextError = ValidationError::UnknownProtocol {
            protocol: "gopher".to_string(),
        }
        .into();
        assert!(err.to_string().contains("Undefined wrapper: gopher"));
        assert!(err.as_validation().is_some());
    }

    #[test]
    fn test_creation_failed_keeps_source() {
        let err = ContextError::CreationFailed(TransportError::Refused("bad combo".into()));
        assert_eq!(
            err.to_string(),
            "Can't create transport handle: Handle refused: bad combo"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
