//! # reqstream HTTP
//!
//! Request modeling on top of [`reqstream_context`].
//!
//! A [`Request`] expresses itself as `http` wrapper options and merges them
//! into a [`TransportContext`](reqstream_context::TransportContext). Once a
//! handle exists, [`HttpSettings::from_options`] reads its options back as
//! typed settings and [`build_client`] turns those into a `reqwest` client.
//! [`prepare`] runs the whole sequence. No request is sent by this crate.
//!
//! ## Usage
//!
//! ```rust
//! use reqstream_context::TransportContext;
//! use reqstream_http::{HttpResult, Request, prepare};
//!
//! fn build() -> HttpResult<()> {
//!     let mut ctx = TransportContext::in_memory();
//!     ctx.set_option("http", "timeout", 10)?;
//!
//!     let mut request = Request::post("https://api.example.com/items")?;
//!     request.set_header("Accept", "application/json")?;
//!     request.set_body(r#"{"name":"widget"}"#);
//!
//!     let prepared = prepare(&mut ctx, &request)?;
//!     assert_eq!(prepared.request.method().as_str(), "POST");
//!     Ok(())
//! }
//! # build().unwrap();
//! ```
//!
//! ## Security
//!
//! Relaxed certificate checks (`ssl.verify_peer = false`,
//! `ssl.allow_self_signed = true`, `curl.curl_verify_ssl_host = false`) only
//! take effect when [`INSECURE_TLS_ENV_VAR`] is set. Otherwise the client
//! keeps full verification and logs an error.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod client;
mod error;
mod method;
mod prepare;
mod request;
mod settings;

pub use client::{INSECURE_TLS_ENV_VAR, build_client};
pub use error::{HttpError, HttpResult};
pub use method::Method;
pub use prepare::{PreparedRequest, prepare};
pub use request::{DEFAULT_PROTOCOL_VERSION, Request};
pub use settings::{
    DEFAULT_MAX_REDIRECTS, HttpSettings, RedirectPolicy, TlsSettings, parse_header_block,
};
