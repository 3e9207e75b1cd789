//! Outgoing request modeling.
//!
//! A [`Request`] is a thin container: method, URL, ordered headers and an
//! optional body. It knows which wrapper its scheme maps to and how to
//! express itself as `http` wrapper options for a
//! [`TransportContext`](reqstream_context::TransportContext).

use std::fmt;

use reqstream_context::{OptionSet, TransportContext, Wrapper};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Version};
use tracing::debug;
use url::Url;

use crate::error::{HttpError, HttpResult};
use crate::method::Method;

/// Default HTTP protocol version sent with requests.
pub const DEFAULT_PROTOCOL_VERSION: f64 = 1.1;

/// Headers `reqwest` derives per request from the URL and body.
const DERIVED_HEADERS: [&str; 2] = ["Host", "Content-Length"];

/// Returns `true` for headers that must not be sent from a stored copy.
pub(crate) fn is_derived_header(name: &str) -> bool {
    DERIVED_HEADERS
        .iter()
        .any(|derived| derived.eq_ignore_ascii_case(name))
}

/// An outgoing HTTP or FTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: Method,
    url: Url,
    headers: Vec<(String, String)>,
    body: Option<String>,
    user_agent: Option<String>,
    protocol_version: f64,
}

impl Request {
    /// Creates a request for `url`.
    ///
    /// # Errors
    ///
    /// [`HttpError::InvalidUrl`] when `url` does not parse.
    pub fn new(method: Method, url: &str) -> HttpResult<Self> {
        Ok(Self {
            method,
            url: Url::parse(url)?,
            headers: Vec::new(),
            body: None,
            user_agent: None,
            protocol_version: DEFAULT_PROTOCOL_VERSION,
        })
    }

    /// Creates a `GET` request.
    ///
    /// # Errors
    ///
    /// [`HttpError::InvalidUrl`] when `url` does not parse.
    pub fn get(url: &str) -> HttpResult<Self> {
        Self::new(Method::Get, url)
    }

    /// Creates a `POST` request.
    ///
    /// # Errors
    ///
    /// [`HttpError::InvalidUrl`] when `url` does not parse.
    pub fn post(url: &str) -> HttpResult<Self> {
        Self::new(Method::Post, url)
    }

    /// Replaces the method.
    pub fn set_method(&mut self, method: Method) -> &mut Self {
        self.method = method;
        self
    }

    /// Appends a header, replacing any header of the same name.
    ///
    /// # Errors
    ///
    /// [`HttpError::InvalidHeader`] for a malformed name or value.
    pub fn set_header(&mut self, name: &str, value: &str) -> HttpResult<&mut Self> {
        HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| HttpError::InvalidHeader(format!("bad header name {name:?}")))?;
        HeaderValue::from_str(value)
            .map_err(|_| HttpError::InvalidHeader(format!("bad value for header {name}")))?;

        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        Ok(self)
    }

    /// Sets the body.
    pub fn set_body(&mut self, body: impl Into<String>) -> &mut Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the `User-Agent`, sent as the `user_agent` option.
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) -> &mut Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the HTTP protocol version (`1.0` or `1.1`).
    pub fn set_protocol_version(&mut self, version: f64) -> &mut Self {
        self.protocol_version = version;
        self
    }

    /// The request method.
    pub const fn method(&self) -> Method {
        self.method
    }

    /// The request URL.
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Looks up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The body, if any.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// The wrapper matching the URL scheme.
    ///
    /// # Errors
    ///
    /// [`HttpError::UnsupportedScheme`] for schemes other than http(s)/ftp(s).
    pub fn wrapper(&self) -> HttpResult<Wrapper> {
        match self.url.scheme() {
            "http" | "https" => Ok(Wrapper::Http),
            "ftp" | "ftps" => Ok(Wrapper::Ftp),
            other => Err(HttpError::UnsupportedScheme(other.to_string())),
        }
    }

    /// The wrapper name matching the URL scheme.
    ///
    /// # Errors
    ///
    /// Same as [`wrapper`](Self::wrapper).
    pub fn protocol(&self) -> HttpResult<&'static str> {
        self.wrapper().map(Wrapper::as_str)
    }

    /// Returns `true` for schemes that need the `ssl` wrapper.
    pub fn is_secure(&self) -> bool {
        matches!(self.url.scheme(), "https" | "ftps")
    }

    /// Adds the headers a request needs before it is sent: `Host`, and
    /// `Content-Length` when there is a body.
    pub fn prepare(&mut self) -> &mut Self {
        if self.header("Host").is_none()
            && let Some(host) = self.url.host_str()
        {
            let host = match self.url.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            };
            self.headers.push(("Host".to_string(), host));
        }

        if let Some(body) = &self.body {
            let length = body.len().to_string();
            self.headers
                .retain(|(n, _)| !n.eq_ignore_ascii_case("Content-Length"));
            self.headers.push(("Content-Length".to_string(), length));
        }
        self
    }

    /// The header block as it appears in the `header` option: one
    /// `Name: value` per line, CRLF separated.
    pub fn header_block(&self) -> String {
        self.headers
            .iter()
            .map(|(n, v)| format!("{n}: {v}"))
            .collect::<Vec<_>>()
            .join("\r\n")
    }

    /// Expresses this request as transport context options.
    ///
    /// # Errors
    ///
    /// [`HttpError::UnsupportedScheme`] when the scheme has no wrapper.
    pub fn context_options(&self) -> HttpResult<OptionSet> {
        let mut options = OptionSet::new();
        if self.wrapper()? != Wrapper::Http {
            return Ok(options);
        }

        let http = Wrapper::Http.as_str();
        options.insert(http, "method", self.method.as_str());
        options.insert(http, "protocol_version", self.protocol_version);
        if !self.headers.is_empty() {
            options.insert(http, "header", self.header_block());
        }
        if let Some(body) = &self.body {
            options.insert(http, "content", body.as_str());
        }
        if let Some(user_agent) = &self.user_agent {
            options.insert(http, "user_agent", user_agent.as_str());
        }
        Ok(options)
    }

    /// Merges this request's options into `ctx`.
    ///
    /// # Errors
    ///
    /// [`HttpError::UnsupportedScheme`], or the context's validation error.
    pub fn apply_to(&self, ctx: &mut TransportContext) -> HttpResult<()> {
        let options = self.context_options()?;
        debug!(url = %self.url, method = %self.method, count = options.len(), "applying request options");
        ctx.set_options(options)?;
        Ok(())
    }

    /// Builds a `reqwest` request on `client`.
    ///
    /// `Host` and `Content-Length` are left to `reqwest`, which derives them
    /// from the URL and body.
    ///
    /// # Errors
    ///
    /// [`HttpError::InvalidMethod`] if the method is rejected by `reqwest`.
    pub fn to_reqwest(&self, client: &Client) -> HttpResult<RequestBuilder> {
        let mut builder = client.request(self.method.to_reqwest()?, self.url.clone());
        for (name, value) in &self.headers {
            if is_derived_header(name) {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        if self.protocol_version < 1.1 {
            builder = builder.version(Version::HTTP_10);
        }
        if let Some(body) = &self.body {
            builder = builder.body(body.clone());
        }
        Ok(builder)
    }

    fn request_target(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{query}", self.url.path()),
            None => self.url.path().to_string(),
        }
    }
}

impl fmt::Display for Request {
    /// Renders the request as it is written to the wire.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} HTTP/{:.1}\r\n",
            self.method,
            self.request_target(),
            self.protocol_version
        )?;
        for (name, value) in &self.headers {
            write!(f, "{name}: {value}\r\n")?;
        }
        f.write_str("\r\n")?;
        if let Some(body) = &self.body {
            f.write_str(body)?;
        }
        Ok(())
    }
}
