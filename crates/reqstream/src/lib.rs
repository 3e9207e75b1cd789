//! # reqstream
//!
//! Validated per-protocol options for stream transports, and the lifecycle
//! of the native handle they configure.
//!
//! ## Features
//!
//! - **Option schemas** - fixed key tables for the `http`, `ftp`, `ssl`,
//!   `curl`, `phar` and `socket` wrappers
//! - **Validation with coercion** - numeric strings are accepted where a
//!   number is expected and stored in their numeric form
//! - **Handle lifecycle** - lazy creation, explicit re-creation and release on drop
//! - **HTTP layer** (`http` feature, default) - request modeling and
//!   `reqwest` client construction from a handle's options
//!
//! ## Quick Start
//!
//! ```rust
//! use reqstream::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut ctx = TransportContext::in_memory();
//!     ctx.set_option("http", "method", "POST")?;
//!     ctx.set_option("ssl", "verify_depth", "3")?;
//!
//!     let err = ctx.set_option("http", "method", "TEAPOT").unwrap_err();
//!     assert!(err.as_validation().is_some());
//!
//!     assert!(ctx.ensure_created(true, None));
//!     let applied = ctx.get_options(None)?;
//!     assert_eq!(applied.get("ssl", "verify_depth"), Some(&OptionValue::Int(3)));
//!     Ok(())
//! }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use reqstream_context as context;
pub use reqstream_transport_traits as transport;

#[cfg(feature = "http")]
#[cfg_attr(docsrs, doc(cfg(feature = "http")))]
pub use reqstream_http as http;

// Re-export tracing for downstream subscribers
pub use tracing;

pub use reqstream_context::{
    ContextError, ContextResult, CreateOptions, HandleState, MemoryPrimitive, OptionSchema,
    OptionValidator, SchemaRegistry, TransportContext, ValidationError, ValueKind, Wrapper,
    schema_for, validate,
};
pub use reqstream_transport_traits::{
    Handle, HandleId, HandleRelease, OptionSet, OptionValue, Params, PrimitiveConfig,
    PrimitiveMetrics, TransportError, TransportPrimitive, TransportResult, WrapperOptions,
};

#[cfg(feature = "http")]
pub use reqstream_http::{HttpError, HttpResult, HttpSettings, Method, Request, prepare};

/// Commonly used types.
pub mod prelude {
    pub use reqstream_context::{
        ContextError, ContextResult, CreateOptions, HandleState, OptionValidator,
        TransportContext, ValidationError, Wrapper,
    };
    pub use reqstream_transport_traits::{
        Handle, OptionSet, OptionValue, Params, TransportPrimitive,
    };

    #[cfg(feature = "http")]
    pub use reqstream_http::{HttpError, HttpSettings, Method, Request, build_client, prepare};
}
