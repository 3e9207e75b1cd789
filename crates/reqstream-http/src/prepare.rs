//! Turning a [`Request`] and a [`TransportContext`] into a ready-to-send
//! `reqwest` request.

use reqstream_context::{HandleId, OptionSet, Params, TransportContext, Wrapper};
use tracing::{debug, info};

use crate::client::build_client;
use crate::error::{HttpError, HttpResult};
use crate::request::Request;
use crate::settings::HttpSettings;

/// A request bound to a configured client. Nothing has been sent.
#[derive(Debug)]
pub struct PreparedRequest {
    /// Handle the settings were read from
    pub handle: HandleId,
    /// Typed settings of that handle
    pub settings: HttpSettings,
    /// Client configured from `settings`
    pub client: reqwest::Client,
    /// The built request
    pub request: reqwest::Request,
}

/// Applies `request` to `ctx`, creates a fresh handle and builds a client
/// and request from the options the handle reports.
///
/// On success `ctx` holds the new handle, releasing any previous one.
///
/// # Errors
///
/// - [`HttpError::UnsupportedScheme`] for schemes `reqwest` cannot serve.
/// - [`HttpError::Context`] when validation or handle creation fails.
/// - Any error from [`HttpSettings::from_options`] or [`build_client`].
pub fn prepare(ctx: &mut TransportContext, request: &Request) -> HttpResult<PreparedRequest> {
    let wrapper = request.wrapper()?;
    if wrapper != Wrapper::Http {
        return Err(HttpError::UnsupportedScheme(request.url().scheme().to_string()));
    }

    request.apply_to(ctx)?;
    let handle = ctx.create(OptionSet::new(), Params::new())?.id();
    let options = ctx.get_options(None)?;
    debug!(%handle, count = options.len(), "reading handle settings");

    let settings = HttpSettings::from_options(&options)?;
    let client = build_client(&settings)?;
    let built = request.to_reqwest(&client)?.build()?;

    info!(%handle, method = %built.method(), url = %built.url(), "prepared request");
    Ok(PreparedRequest {
        handle,
        settings,
        client,
        request: built,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    #[test]
    fn test_prepare_binds_handle_to_request() {
        let mut ctx = TransportContext::in_memory();
        ctx.set_option("http", "timeout", "4").unwrap();

        let mut request = Request::new(Method::Delete, "https://example.com/item/1").unwrap();
        request.prepare();
        let prepared = prepare(&mut ctx, &request).unwrap();

        assert_eq!(ctx.handle().map(|h| h.id()), Some(prepared.handle));
        assert_eq!(prepared.settings.method, Method::Delete);
        assert_eq!(prepared.request.method(), reqwest::Method::DELETE);
        assert_eq!(
            prepared.settings.timeout,
            Some(std::time::Duration::from_secs(4))
        );
    }

    #[test]
    fn test_prepare_rejects_ftp() {
        let mut ctx = TransportContext::in_memory();
        let request = Request::get("ftp://example.com/file").unwrap();

        assert!(matches!(
            prepare(&mut ctx, &request),
            Err(HttpError::UnsupportedScheme(ref s)) if s == "ftp"
        ));
        assert!(!ctx.is_created());
    }
}
