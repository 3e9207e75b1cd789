//! # reqstream Transport Traits
//!
//! Core option, handle and primitive types for the reqstream request library.
//! This crate provides the foundational abstractions the transport context and
//! every transport primitive depend on.
//!
//! ## Overview
//!
//! This crate defines:
//! - **Values**: [`OptionValue`], [`WrapperOptions`], [`OptionSet`], [`Params`]
//! - **Handles**: [`Handle`], [`HandleId`], [`HandleRelease`]
//! - **Traits**: [`TransportPrimitive`]
//! - **Errors**: [`TransportError`], [`TransportResult`]
//! - **Config**: [`PrimitiveConfig`]
//! - **Metrics**: [`PrimitiveMetrics`], [`AtomicPrimitiveMetrics`]
//!
//! ## Usage
//!
//! Primitive implementations depend on this crate and implement [`TransportPrimitive`]:
//!
//! ```rust,ignore
//! use reqstream_transport_traits::{Handle, OptionSet, Params, TransportPrimitive, TransportResult};
//!
//! #[derive(Debug)]
//! struct MyPrimitive { /* ... */ }
//!
//! impl TransportPrimitive for MyPrimitive {
//!     fn create_handle(&self, options: &OptionSet, params: &Params) -> TransportResult<Handle> {
//!         /* ... */
//!     }
//!     // ... other trait methods
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
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

mod config;
mod error;
mod handle;
mod metrics;
mod traits;
mod value;

// Re-export all public items
pub use config::PrimitiveConfig;
pub use error::{TransportError, TransportResult};
pub use handle::{Handle, HandleId, HandleRelease};
pub use metrics::{AtomicPrimitiveMetrics, PrimitiveMetrics};
pub use traits::TransportPrimitive;
pub use value::{OptionSet, OptionValue, Params, WrapperOptions};
