//! HTTP layer error types.

use thiserror::Error;

use reqstream_context::ContextError;

/// A specialized `Result` type for the HTTP layer.
pub type HttpResult<T> = std::result::Result<T, HttpError>;

/// Represents errors raised while building requests or clients.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpError {
    /// The transport context rejected the request's options.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// The request URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The method is not one the http wrapper accepts.
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// A header name or value is malformed.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The URL scheme has no matching wrapper.
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// A stored option cannot be turned into a client setting.
    #[error("Invalid setting {wrapper}.{key}: {reason}")]
    InvalidSetting {
        /// Wrapper the option belongs to
        wrapper: &'static str,
        /// Option key
        key: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Reading TLS material failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HttpError {
    pub(crate) fn setting(wrapper: &'static str, key: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            wrapper,
            key,
            reason: reason.into(),
        }
    }
}
