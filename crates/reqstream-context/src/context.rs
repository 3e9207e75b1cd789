//! The transport context.
//!
//! A [`TransportContext`] accumulates validated options for any number of
//! wrappers and materializes a native handle from them on demand. The handle
//! is a snapshot: options merged after creation only reach the transport
//! once the handle is recreated.

use std::sync::Arc;

use tracing::{debug, info, warn};

use reqstream_transport_traits::{
    Handle, OptionSet, OptionValue, Params, TransportError, TransportPrimitive, WrapperOptions,
};

use crate::error::{ContextError, ContextResult};
use crate::json::options_from_json;
use crate::lifecycle::{CreateOptions, HandleSlot, HandleState};
use crate::memory::MemoryPrimitive;
use crate::schema::SchemaRegistry;
use crate::validator::OptionValidator;

/// Accumulated, validated transport options plus the handle built from them.
///
/// Mutating operations take `&mut self`; share a context across threads
/// only behind a lock.
#[derive(Debug)]
pub struct TransportContext {
    primitive: Arc<dyn TransportPrimitive>,
    registry: Arc<SchemaRegistry>,
    options: OptionSet,
    params: Params,
    slot: HandleSlot,
}

impl TransportContext {
    /// Creates a context over `primitive` using the built-in wrappers.
    pub fn new(primitive: Arc<dyn TransportPrimitive>) -> Self {
        Self::with_registry(primitive, SchemaRegistry::shared())
    }

    /// Creates a context that validates against a custom registry.
    pub fn with_registry(
        primitive: Arc<dyn TransportPrimitive>,
        registry: Arc<SchemaRegistry>,
    ) -> Self {
        Self {
            primitive,
            registry,
            options: OptionSet::new(),
            params: Params::new(),
            slot: HandleSlot::default(),
        }
    }

    /// Creates a context backed by a fresh [`MemoryPrimitive`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryPrimitive::default()))
    }

    fn validator(&self) -> OptionValidator<'_> {
        OptionValidator::new(&self.registry)
    }

    /// Sets a single option.
    ///
    /// # Errors
    ///
    /// [`ContextError::InvalidArgument`] when `protocol` or `key` is empty,
    /// otherwise any [`ValidationError`](crate::ValidationError).
    pub fn set_option(
        &mut self,
        protocol: &str,
        key: &str,
        value: impl Into<OptionValue>,
    ) -> ContextResult<()> {
        if protocol.is_empty() {
            return Err(ContextError::invalid_argument(
                "Wrapper name must be a non-empty string",
            ));
        }
        if key.is_empty() {
            return Err(ContextError::invalid_argument(format!(
                "Can't set options for {protocol}: option key is missing"
            )));
        }

        let mut options = WrapperOptions::new();
        options.insert(key.to_string(), value.into());
        self.set_wrapper_options(protocol, options)
    }

    /// Merges a batch of options for one wrapper.
    ///
    /// # Errors
    ///
    /// Any [`ValidationError`](crate::ValidationError); nothing is merged on failure.
    pub fn set_wrapper_options(
        &mut self,
        protocol: &str,
        options: WrapperOptions,
    ) -> ContextResult<()> {
        let normalized = self.validator().normalize(protocol, &options)?;
        debug!(wrapper = protocol, count = normalized.len(), "merging wrapper options");
        self.options.merge_wrapper(protocol, normalized);
        Ok(())
    }

    /// Merges a multi-wrapper batch. Every wrapper is validated before any
    /// option is merged.
    ///
    /// # Errors
    ///
    /// Any [`ValidationError`](crate::ValidationError); nothing is merged on failure.
    pub fn set_options(&mut self, options: OptionSet) -> ContextResult<()> {
        let normalized = self.validator().normalize_set(&options)?;
        debug!(
            wrappers = normalized.wrappers().count(),
            count = normalized.len(),
            "merging options"
        );
        self.options.merge(normalized);
        Ok(())
    }

    /// Merges an untyped `{wrapper: {key: value}}` document.
    ///
    /// # Errors
    ///
    /// [`ContextError::InvalidArgument`] for a malformed document, otherwise
    /// any [`ValidationError`](crate::ValidationError).
    pub fn set_options_json(&mut self, document: &serde_json::Value) -> ContextResult<()> {
        self.set_options(options_from_json(document)?)
    }

    /// Sets transport-level params. They are not validated.
    ///
    /// Params are kept for the next creation. When a handle is live they are
    /// also forwarded to it and the primitive's answer is returned.
    pub fn set_params(&mut self, params: Params) -> bool {
        let accepted = match self.slot.get() {
            Some(handle) => self.primitive.set_params(handle, &params),
            None => true,
        };
        self.params.extend(params);
        accepted
    }

    /// Merges `options` and `params`, then materializes a new handle from
    /// the full accumulated state. The previous handle, if any, is released
    /// once the new one exists.
    ///
    /// # Errors
    ///
    /// Any [`ValidationError`](crate::ValidationError) for `options`, or
    /// [`ContextError::CreationFailed`] when the primitive refuses. A failed
    /// creation leaves the previous handle in place.
    pub fn create(&mut self, options: OptionSet, params: Params) -> ContextResult<&Handle> {
        self.set_options(options)?;
        self.params.extend(params);

        let created = match self.slot.get() {
            Some(current) => self
                .primitive
                .replace_handle(current, &self.options, &self.params),
            None => self.primitive.create_handle(&self.options, &self.params),
        };
        let handle = created.map_err(ContextError::CreationFailed)?;
        info!(
            handle = %handle.id(),
            options = self.options.len(),
            params = self.params.len(),
            "transport handle created"
        );
        Ok(self.slot.replace(handle))
    }

    /// Makes sure a usable handle exists.
    ///
    /// Returns `true` at once when a handle is live. Without one, returns
    /// `false` unless `auto_create` is set, in which case a handle is created
    /// from `fallback` (empty by default). Creation failures are logged and
    /// reported as `false`; call [`create`](Self::create) to get the reason.
    pub fn ensure_created(&mut self, auto_create: bool, fallback: Option<CreateOptions>) -> bool {
        if self.slot.get().is_some() {
            return true;
        }
        if !auto_create {
            return false;
        }

        let CreateOptions { options, params } = fallback.unwrap_or_default();
        match self.create(options, params) {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "automatic handle creation failed");
                false
            }
        }
    }

    fn target<'a>(&'a self, handle: Option<&'a Handle>) -> ContextResult<&'a Handle> {
        handle.or_else(|| self.slot.get()).ok_or_else(|| {
            ContextError::invalid_argument("Context has no handle yet; call create() first")
        })
    }

    fn unreadable(err: TransportError) -> ContextError {
        ContextError::invalid_argument(format!("Argument must be a live handle: {err}"))
    }

    /// Reads the options of `handle`, or of this context's own handle.
    ///
    /// # Errors
    ///
    /// [`ContextError::InvalidArgument`] when the handle is unknown to the
    /// primitive, or when no handle is given and none has been created.
    pub fn get_options(&self, handle: Option<&Handle>) -> ContextResult<OptionSet> {
        let handle = self.target(handle)?;
        debug!(handle = %handle.id(), "reading handle options");
        self.primitive.read_options(handle).map_err(Self::unreadable)
    }

    /// Reads the params of `handle`, or of this context's own handle.
    ///
    /// # Errors
    ///
    /// Same as [`get_options`](Self::get_options).
    pub fn get_params(&self, handle: Option<&Handle>) -> ContextResult<Params> {
        let handle = self.target(handle)?;
        debug!(handle = %handle.id(), "reading handle params");
        self.primitive.read_params(handle).map_err(Self::unreadable)
    }

    /// Current handle state.
    pub fn state(&self) -> HandleState {
        self.slot.state()
    }

    /// The live handle, if any.
    pub fn handle(&self) -> Option<&Handle> {
        self.slot.get()
    }

    /// Returns `true` when a handle is live.
    pub fn is_created(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Options accumulated so far, including those not yet applied to a handle.
    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// Params accumulated so far.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The primitive handles are created through.
    pub fn primitive(&self) -> &Arc<dyn TransportPrimitive> {
        &self.primitive
    }

    /// The registry options are validated against.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }
}
