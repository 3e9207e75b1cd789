//! # reqstream Context
//!
//! Transport context configuration and validation.
//!
//! Options are scoped by wrapper (`http`, `ftp`, `ssl`, `curl`, `phar`,
//! `socket`). Each wrapper has a fixed schema of allowed keys and value
//! kinds; [`OptionValidator`] checks caller-supplied values against it and
//! coerces numeric strings where a number is expected. [`TransportContext`]
//! accumulates the validated options and turns them into a native
//! [`Handle`] through a [`TransportPrimitive`].
//!
//! ## Usage
//!
//! ```rust
//! use reqstream_context::{TransportContext, ContextResult};
//!
//! fn configure() -> ContextResult<()> {
//!     let mut ctx = TransportContext::in_memory();
//!     ctx.set_option("http", "method", "POST")?;
//!     ctx.set_option("http", "timeout", "2.5")?;
//!     ctx.set_option("ssl", "verify_depth", "3")?;
//!
//!     assert!(ctx.ensure_created(true, None));
//!     let applied = ctx.get_options(None)?;
//!     assert_eq!(applied.get("ssl", "verify_depth").and_then(|v| v.as_int()), Some(3));
//!     Ok(())
//! }
//! # configure().unwrap();
//! ```
//!
//! ## Handle lifecycle
//!
//! A context starts without a handle. [`TransportContext::create`] always
//! builds a new one and releases the old; [`TransportContext::ensure_created`]
//! only builds one when none exists.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod context;
mod error;
mod json;
mod lifecycle;
mod memory;
mod schema;
mod validator;

pub use context::TransportContext;
pub use error::{ContextError, ContextResult, ValidationError};
pub use json::{options_from_json, params_from_json, wrapper_from_json};
pub use lifecycle::{CreateOptions, HandleState};
pub use memory::MemoryPrimitive;
pub use schema::{HTTP_METHODS, OptionSchema, SchemaRegistry, ValueKind, Wrapper, schema_for};
pub use validator::{OptionValidator, validate};

// Re-export common types from traits crate for convenience
pub use reqstream_transport_traits::{
    Handle, HandleId, OptionSet, OptionValue, Params, PrimitiveConfig, PrimitiveMetrics,
    TransportError, TransportPrimitive, TransportResult, WrapperOptions,
};
