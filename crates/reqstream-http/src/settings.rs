//! Typed view of a handle's options.
//!
//! Handles store options as loosely typed [`OptionValue`]s. The client
//! builder wants durations, paths and policies, so [`HttpSettings`] reads
//! the `http`, `ssl`, `curl` and `socket` wrappers once and exposes them as
//! Rust types. Values go through the same coercion as validation, so a
//! numeric string stored by a caller reads back as a number.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use reqstream_context::{OptionSet, OptionValue, ValueKind, Wrapper};

use crate::error::{HttpError, HttpResult};
use crate::method::Method;
use crate::request::{DEFAULT_PROTOCOL_VERSION, is_derived_header};

/// Redirect limit applied when `max_redirects` is absent.
pub const DEFAULT_MAX_REDIRECTS: usize = 20;

/// How redirects are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectPolicy {
    /// Redirects are returned to the caller
    None,
    /// Follow up to this many hops
    Limited(usize),
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        Self::Limited(DEFAULT_MAX_REDIRECTS)
    }
}

/// TLS settings from the `ssl` wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsSettings {
    /// Verify the peer certificate
    pub verify_peer: bool,
    /// Accept self-signed certificates
    pub allow_self_signed: bool,
    /// Verify that the certificate matches the host name
    pub verify_host: bool,
    /// PEM or DER file with extra trust roots
    pub cafile: Option<PathBuf>,
    /// Directory of extra trust roots
    pub capath: Option<PathBuf>,
    /// PEM file with client certificate and key
    pub local_cert: Option<PathBuf>,
    /// Passphrase for `local_cert`
    pub passphrase: Option<String>,
    /// Expected peer name
    pub peer_name: Option<String>,
    /// Send the server name indication extension
    pub sni_enabled: bool,
    /// Maximum chain depth
    pub verify_depth: Option<u32>,
    /// Cipher list
    pub ciphers: Option<String>,
    /// Keep the peer certificate after the handshake
    pub capture_peer_cert: bool,
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self {
            verify_peer: true,
            allow_self_signed: false,
            verify_host: true,
            cafile: None,
            capath: None,
            local_cert: None,
            passphrase: None,
            peer_name: None,
            sni_enabled: true,
            verify_depth: None,
            ciphers: None,
            capture_peer_cert: false,
        }
    }
}

impl TlsSettings {
    /// Returns true when certificate checks are relaxed.
    pub fn is_insecure(&self) -> bool {
        !self.verify_peer || self.allow_self_signed || !self.verify_host
    }

    fn from_options(options: &OptionSet) -> HttpResult<Self> {
        let ssl = Reader::new(options, Wrapper::Ssl);
        let curl = Reader::new(options, Wrapper::Curl);
        let defaults = Self::default();

        let verify_peer = match curl.bool("curl_verify_ssl_peer")? {
            Some(verify) => verify,
            None => ssl.bool("verify_peer")?.unwrap_or(defaults.verify_peer),
        };
        let verify_depth = ssl
            .int("verify_depth")?
            .map(|depth| {
                u32::try_from(depth)
                    .map_err(|_| HttpError::setting("ssl", "verify_depth", "out of range"))
            })
            .transpose()?;

        Ok(Self {
            verify_peer,
            allow_self_signed: ssl.bool("allow_self_signed")?.unwrap_or(false),
            verify_host: curl.bool("curl_verify_ssl_host")?.unwrap_or(true),
            cafile: ssl.string("cafile")?.map(PathBuf::from),
            capath: ssl.string("capath")?.map(PathBuf::from),
            local_cert: ssl.string("local_cert")?.map(PathBuf::from),
            passphrase: ssl.string("passphrase")?,
            peer_name: match ssl.string("SNI_server_name")? {
                Some(name) => Some(name),
                None => ssl.string("CN_match")?,
            },
            sni_enabled: ssl.bool("SNI_enabled")?.unwrap_or(defaults.sni_enabled),
            verify_depth,
            ciphers: ssl.string("ciphers")?,
            capture_peer_cert: ssl.bool("capture_peer_cert")?.unwrap_or(false)
                || ssl.bool("capture_peer_cert_chain")?.unwrap_or(false),
        })
    }
}

/// Client settings derived from a handle's options.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpSettings {
    /// Request method
    pub method: Method,
    /// Extra headers, in order
    pub headers: Vec<(String, String)>,
    /// `User-Agent` value
    pub user_agent: Option<String>,
    /// Request body
    pub content: Option<String>,
    /// Proxy URL
    pub proxy: Option<String>,
    /// Send the absolute URI as request target when proxying
    pub request_fulluri: bool,
    /// Redirect handling
    pub redirect: RedirectPolicy,
    /// HTTP protocol version
    pub protocol_version: f64,
    /// Overall request timeout
    pub timeout: Option<Duration>,
    /// Return error status bodies instead of failing
    pub ignore_errors: bool,
    /// Local address to bind outgoing sockets to
    pub bind_address: Option<IpAddr>,
    /// TLS settings
    pub tls: TlsSettings,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            method: Method::default(),
            headers: Vec::new(),
            user_agent: None,
            content: None,
            proxy: None,
            request_fulluri: false,
            redirect: RedirectPolicy::default(),
            protocol_version: DEFAULT_PROTOCOL_VERSION,
            timeout: None,
            ignore_errors: false,
            bind_address: None,
            tls: TlsSettings::default(),
        }
    }
}

impl HttpSettings {
    /// Reads settings from a handle's applied options.
    ///
    /// `http` keys take precedence over their `curl` counterparts.
    ///
    /// # Errors
    ///
    /// [`HttpError::InvalidSetting`] when a value has the wrong shape or is
    /// out of range, and [`HttpError::InvalidHeader`] for a malformed header
    /// block.
    pub fn from_options(options: &OptionSet) -> HttpResult<Self> {
        let http = Reader::new(options, Wrapper::Http);
        let curl = Reader::new(options, Wrapper::Curl);
        let socket = Reader::new(options, Wrapper::Socket);

        let method = match http.string("method")?.or(curl.string("method")?) {
            Some(method) => method.parse()?,
            None => Method::default(),
        };
        let headers = match http.string("header")?.or(curl.string("header")?) {
            Some(block) => parse_header_block(&block)?
                .into_iter()
                .filter(|(name, _)| !is_derived_header(name))
                .collect(),
            None => Vec::new(),
        };

        Ok(Self {
            method,
            headers,
            user_agent: http.string("user_agent")?.or(curl.string("user_agent")?),
            content: http.string("content")?.or(curl.string("content")?),
            proxy: http.string("proxy")?.or(curl.string("proxy")?),
            request_fulluri: http.bool("request_fulluri")?.unwrap_or(false),
            redirect: redirect_policy(&http, &curl)?,
            protocol_version: http
                .float("protocol_version")?
                .unwrap_or(DEFAULT_PROTOCOL_VERSION),
            timeout: timeout(&http)?,
            ignore_errors: http.bool("ignore_errors")?.unwrap_or(false),
            bind_address: socket
                .string("bindto")?
                .map(|bindto| parse_bind_address(&bindto))
                .transpose()?,
            tls: TlsSettings::from_options(options)?,
        })
    }
}

fn redirect_policy(http: &Reader<'_>, curl: &Reader<'_>) -> HttpResult<RedirectPolicy> {
    if http.int("follow_location")? == Some(0) {
        return Ok(RedirectPolicy::None);
    }

    let (wrapper, max) = match http.int("max_redirects")? {
        Some(max) => (http.wrapper, Some(max)),
        None => (curl.wrapper, curl.int("max_redirects")?),
    };
    match max {
        None => Ok(RedirectPolicy::default()),
        Some(max) => usize::try_from(max)
            .map(RedirectPolicy::Limited)
            .map_err(|_| HttpError::setting(wrapper, "max_redirects", "must not be negative")),
    }
}

fn timeout(http: &Reader<'_>) -> HttpResult<Option<Duration>> {
    match http.float("timeout")? {
        None => Ok(None),
        Some(secs) if secs.abs() < f64::EPSILON => Ok(None),
        Some(secs) => Duration::try_from_secs_f64(secs)
            .map(Some)
            .map_err(|e| HttpError::setting("http", "timeout", e.to_string())),
    }
}

/// Splits a header block into `(name, value)` pairs.
///
/// Lines are separated by `\r\n` or `\n`; blank lines are skipped.
///
/// # Errors
///
/// [`HttpError::InvalidHeader`] for a line without a colon or with an empty
/// name.
pub fn parse_header_block(block: &str) -> HttpResult<Vec<(String, String)>> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| HttpError::InvalidHeader(format!("missing ':' in {line:?}")))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(HttpError::InvalidHeader(format!("empty name in {line:?}")));
            }
            Ok((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Parses a `socket.bindto` value (`ip:port`, `[v6]:port`, bare ip, or
/// `0:port` for any interface). The port is not used by the client.
fn parse_bind_address(bindto: &str) -> HttpResult<IpAddr> {
    let invalid = || HttpError::setting("socket", "bindto", format!("cannot parse {bindto:?}"));

    if let Ok(addr) = bindto.parse::<std::net::SocketAddr>() {
        return Ok(addr.ip());
    }
    if let Ok(ip) = bindto.parse::<IpAddr>() {
        return Ok(ip);
    }

    let (host, port) = bindto.rsplit_once(':').ok_or_else(invalid)?;
    port.parse::<u16>().map_err(|_| invalid())?;
    match host.trim_start_matches('[').trim_end_matches(']') {
        "" | "0" => Ok(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
        host => host.parse().map_err(|_| invalid()),
    }
}

/// Reads one wrapper's values, coerced to the kind each getter wants.
struct Reader<'a> {
    options: &'a OptionSet,
    wrapper: &'static str,
}

impl<'a> Reader<'a> {
    fn new(options: &'a OptionSet, wrapper: Wrapper) -> Self {
        Self {
            options,
            wrapper: wrapper.as_str(),
        }
    }

    fn coerced(&self, key: &'static str, kind: &ValueKind) -> HttpResult<Option<OptionValue>> {
        let Some(value) = self.options.get(self.wrapper, key) else {
            return Ok(None);
        };
        kind.coerce(value).map(Some).ok_or_else(|| {
            HttpError::setting(
                self.wrapper,
                key,
                format!("expected {kind}, found {} `{value}`", value.type_name()),
            )
        })
    }

    fn bool(&self, key: &'static str) -> HttpResult<Option<bool>> {
        Ok(self
            .coerced(key, &ValueKind::Bool)?
            .and_then(|v| v.as_bool()))
    }

    fn int(&self, key: &'static str) -> HttpResult<Option<i64>> {
        Ok(self.coerced(key, &ValueKind::Int)?.and_then(|v| v.as_int()))
    }

    fn float(&self, key: &'static str) -> HttpResult<Option<f64>> {
        Ok(self
            .coerced(key, &ValueKind::Float)?
            .and_then(|v| v.as_float()))
    }

    fn string(&self, key: &'static str) -> HttpResult<Option<String>> {
        Ok(self
            .coerced(key, &ValueKind::Str)?
            .and_then(|v| v.as_str().map(str::to_string)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options(entries: &[(&str, &str, OptionValue)]) -> OptionSet {
        let mut set = OptionSet::new();
        for (wrapper, key, value) in entries {
            set.insert(*wrapper, *key, value.clone());
        }
        set
    }

    #[test]
    fn test_defaults_from_empty_options() {
        let settings = HttpSettings::from_options(&OptionSet::new()).unwrap();
        assert_eq!(settings, HttpSettings::default());
        assert!(!settings.tls.is_insecure());
    }

    #[test]
    fn test_timeout_is_coerced_from_string() {
        let set = options(&[("http", "timeout", OptionValue::from("2.5"))]);
        let settings = HttpSettings::from_options(&set).unwrap();
        assert_eq!(settings.timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let set = options(&[("http", "timeout", OptionValue::Int(0))]);
        assert_eq!(HttpSettings::from_options(&set).unwrap().timeout, None);
    }

    #[test]
    fn test_negative_timeout_is_rejected() {
        let set = options(&[("http", "timeout", OptionValue::Float(-1.0))]);
        assert!(matches!(
            HttpSettings::from_options(&set),
            Err(HttpError::InvalidSetting { key: "timeout", .. })
        ));
    }

    #[test]
    fn test_redirect_policy() {
        let off = options(&[("http", "follow_location", OptionValue::Int(0))]);
        assert_eq!(
            HttpSettings::from_options(&off).unwrap().redirect,
            RedirectPolicy::None
        );

        let limited = options(&[("http", "max_redirects", OptionValue::from("3"))]);
        assert_eq!(
            HttpSettings::from_options(&limited).unwrap().redirect,
            RedirectPolicy::Limited(3)
        );

        let curl = options(&[("curl", "max_redirects", OptionValue::Int(7))]);
        assert_eq!(
            HttpSettings::from_options(&curl).unwrap().redirect,
            RedirectPolicy::Limited(7)
        );
    }

    #[test]
    fn test_http_wins_over_curl() {
        let set = options(&[
            ("http", "method", OptionValue::from("PUT")),
            ("curl", "method", OptionValue::from("DELETE")),
            ("curl", "user_agent", OptionValue::from("curl-agent")),
        ]);
        let settings = HttpSettings::from_options(&set).unwrap();
        assert_eq!(settings.method, Method::Put);
        assert_eq!(settings.user_agent.as_deref(), Some("curl-agent"));
    }

    #[test]
    fn test_header_block_parsing() {
        let headers = parse_header_block("Accept: text/html\r\nX-Id:  42 \n\n").unwrap();
        assert_eq!(
            headers,
            vec![
                ("Accept".to_string(), "text/html".to_string()),
                ("X-Id".to_string(), "42".to_string()),
            ]
        );
        assert!(parse_header_block("no colon here").is_err());
        assert!(parse_header_block(": value").is_err());
    }

    #[test]
    fn test_derived_headers_are_dropped() {
        let set = options(&[(
            "http",
            "header",
            OptionValue::from("Host: a.example.com\r\nContent-Length: 5\r\nX-Id: 1"),
        )]);
        let settings = HttpSettings::from_options(&set).unwrap();
        assert_eq!(settings.headers, vec![("X-Id".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_bind_address_forms() {
        assert_eq!(
            parse_bind_address("127.0.0.1:0").unwrap(),
            "127.0.0.1".parse::<IpAddr>().unwrap()
        );
        assert_eq!(
            parse_bind_address("0:7000").unwrap(),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
        assert_eq!(
            parse_bind_address("[::1]:8080").unwrap(),
            "::1".parse::<IpAddr>().unwrap()
        );
        assert!(parse_bind_address("not-an-address").is_err());
    }

    #[test]
    fn test_tls_settings() {
        let set = options(&[
            ("ssl", "verify_peer", OptionValue::Bool(false)),
            ("ssl", "verify_depth", OptionValue::from("4")),
            ("ssl", "CN_match", OptionValue::from("example.com")),
            ("ssl", "cafile", OptionValue::from("/etc/ca.pem")),
        ]);
        let tls = HttpSettings::from_options(&set).unwrap().tls;

        assert!(tls.is_insecure());
        assert_eq!(tls.verify_depth, Some(4));
        assert_eq!(tls.peer_name.as_deref(), Some("example.com"));
        assert_eq!(tls.cafile, Some(PathBuf::from("/etc/ca.pem")));
    }

    #[test]
    fn test_curl_peer_verification_overrides_ssl() {
        let set = options(&[
            ("ssl", "verify_peer", OptionValue::Bool(true)),
            ("curl", "curl_verify_ssl_peer", OptionValue::Bool(false)),
        ]);
        assert!(!HttpSettings::from_options(&set).unwrap().tls.verify_peer);
    }

    #[test]
    fn test_wrong_shape_is_invalid_setting() {
        let set = options(&[("ssl", "verify_peer", OptionValue::from("yes"))]);
        assert!(matches!(
            HttpSettings::from_options(&set),
            Err(HttpError::InvalidSetting { wrapper: "ssl", key: "verify_peer", .. })
        ));
    }
}
