//! `reqwest` client construction from [`HttpSettings`].

use std::fs;
use std::path::Path;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Certificate, Client, Identity, Proxy, redirect};
use tracing::{debug, error, info, warn};

use crate::error::{HttpError, HttpResult};
use crate::request::is_derived_header;
use crate::settings::{HttpSettings, RedirectPolicy, TlsSettings};

/// Environment variable that must be set before relaxed TLS settings take
/// effect.
pub const INSECURE_TLS_ENV_VAR: &str = "REQSTREAM_ALLOW_INSECURE_TLS";

/// Builds a client configured from `settings`.
///
/// Options the client cannot honour (`ssl.ciphers`, `ssl.verify_depth`,
/// peer certificate capture) are logged and ignored.
///
/// # Errors
///
/// - [`HttpError::InvalidHeader`] for a header `reqwest` rejects.
/// - [`HttpError::Io`] when TLS material cannot be read.
/// - [`HttpError::Client`] when the proxy, identity or client is invalid.
pub fn build_client(settings: &HttpSettings) -> HttpResult<Client> {
    // Cargo features are additive; pin the backend explicitly.
    let mut builder = Client::builder().use_rustls_tls();

    if let Some(timeout) = settings.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(user_agent) = &settings.user_agent {
        builder = builder.user_agent(user_agent);
    }
    if settings.protocol_version < 2.0 {
        builder = builder.http1_only();
    }

    builder = builder.redirect(match settings.redirect {
        RedirectPolicy::None => redirect::Policy::none(),
        RedirectPolicy::Limited(max) => redirect::Policy::limited(max),
    });

    if !settings.headers.is_empty() {
        builder = builder.default_headers(header_map(&settings.headers)?);
    }

    if let Some(proxy) = &settings.proxy {
        builder = builder.proxy(Proxy::all(proxy_url(proxy))?);
    }
    if settings.request_fulluri {
        debug!("request_fulluri is implied by the proxy configuration");
    }

    if let Some(address) = settings.bind_address {
        builder = builder.local_address(address);
    }

    builder = apply_tls(builder, &settings.tls)?;

    Ok(builder.build()?)
}

fn header_map(headers: &[(String, String)]) -> HttpResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter().filter(|(name, _)| !is_derived_header(name)) {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| HttpError::InvalidHeader(format!("bad header name {name:?}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| HttpError::InvalidHeader(format!("bad value for header {name}")))?;
        map.append(header_name, header_value);
    }
    Ok(map)
}

/// Stream contexts spell proxies as `tcp://host:port`.
fn proxy_url(proxy: &str) -> String {
    match proxy.strip_prefix("tcp://") {
        Some(rest) => format!("http://{rest}"),
        None => proxy.to_string(),
    }
}

fn apply_tls(
    mut builder: reqwest::ClientBuilder,
    tls: &TlsSettings,
) -> HttpResult<reqwest::ClientBuilder> {
    builder = builder.tls_sni(tls.sni_enabled);

    if tls.is_insecure() {
        if std::env::var(INSECURE_TLS_ENV_VAR).is_err() {
            error!(
                "SECURITY: Certificate verification relaxed but {} not set. \
                 Keeping full verification. Set {}=1 to allow insecure TLS.",
                INSECURE_TLS_ENV_VAR, INSECURE_TLS_ENV_VAR
            );
        } else {
            warn!(
                verify_peer = tls.verify_peer,
                allow_self_signed = tls.allow_self_signed,
                verify_host = tls.verify_host,
                "SECURITY WARNING: TLS certificate verification is relaxed. \
                 Only use this against servers you control."
            );
            if !tls.verify_peer || tls.allow_self_signed {
                builder = builder.danger_accept_invalid_certs(true);
            }
            if !tls.verify_host {
                builder = builder.danger_accept_invalid_hostnames(true);
            }
        }
    }

    if let Some(cafile) = &tls.cafile {
        let bytes = fs::read(cafile)?;
        let cert = parse_certificate(&bytes).ok_or_else(|| {
            HttpError::setting("ssl", "cafile", format!("{} is not PEM or DER", cafile.display()))
        })?;
        builder = builder.add_root_certificate(cert);
        debug!(path = %cafile.display(), "loaded CA file");
    }

    if let Some(capath) = &tls.capath {
        builder = load_ca_directory(builder, capath)?;
    }

    if let Some(local_cert) = &tls.local_cert {
        if tls.passphrase.is_some() {
            warn!("ssl.passphrase is not supported; local_cert must hold an unencrypted key");
        }
        let pem = fs::read(local_cert)?;
        builder = builder.identity(Identity::from_pem(&pem)?);
        debug!(path = %local_cert.display(), "loaded client identity");
    }

    if let Some(peer_name) = &tls.peer_name {
        debug!(peer_name = %peer_name, "peer name checks use the request host");
    }
    if tls.ciphers.is_some() {
        debug!("ssl.ciphers is not supported by the TLS backend, ignoring");
    }
    if let Some(depth) = tls.verify_depth {
        debug!(depth, "ssl.verify_depth is not supported by the TLS backend, ignoring");
    }
    if tls.capture_peer_cert {
        debug!("peer certificate capture is not supported, ignoring");
    }

    Ok(builder)
}

fn parse_certificate(bytes: &[u8]) -> Option<Certificate> {
    Certificate::from_pem(bytes)
        .or_else(|_| Certificate::from_der(bytes))
        .ok()
}

fn load_ca_directory(
    mut builder: reqwest::ClientBuilder,
    dir: &Path,
) -> HttpResult<reqwest::ClientBuilder> {
    let mut loaded = 0usize;
    let mut total = 0usize;

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        total += 1;

        match parse_certificate(&fs::read(&path)?) {
            Some(cert) => {
                builder = builder.add_root_certificate(cert);
                loaded += 1;
            }
            None => warn!(path = %path.display(), "Failed to parse CA certificate, skipping"),
        }
    }

    if loaded == 0 && total > 0 {
        error!("All {} certificates in {} failed to parse", total, dir.display());
    }
    if loaded > 0 {
        info!("Loaded {}/{} CA certificates from {}", loaded, total, dir.display());
    }
    Ok(builder)
}
