//! In-process transport primitive.
//!
//! [`MemoryPrimitive`] is a local handle allocator: creating a handle records
//! a snapshot of the options and params it was built from, and dropping the
//! handle frees that record. No I/O happens here.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use reqstream_transport_traits::{
    AtomicPrimitiveMetrics, Handle, HandleId, HandleRelease, OptionSet, OptionValue, Params,
    PrimitiveConfig, PrimitiveMetrics, TransportError, TransportPrimitive, TransportResult,
};

/// Numeric options that must never be negative.
const NON_NEGATIVE: [(&str, &str); 7] = [
    ("http", "timeout"),
    ("http", "follow_location"),
    ("http", "max_redirects"),
    ("curl", "max_redirects"),
    ("ftp", "resume_pos"),
    ("ssl", "verify_depth"),
    ("phar", "compress"),
];

#[derive(Debug, Clone)]
struct Entry {
    options: OptionSet,
    params: Params,
}

#[derive(Debug, Default)]
struct Registry {
    entries: Mutex<HashMap<HandleId, Entry>>,
    metrics: AtomicPrimitiveMetrics,
}

impl HandleRelease for Registry {
    fn release(&self, id: HandleId) {
        if self.entries.lock().remove(&id).is_some() {
            self.metrics.record_released();
            debug!(handle = %id, "handle released");
        }
    }
}

/// A thread-safe primitive that keeps handle state in memory.
#[derive(Debug, Clone)]
pub struct MemoryPrimitive {
    registry: Arc<Registry>,
    config: PrimitiveConfig,
}

impl Default for MemoryPrimitive {
    fn default() -> Self {
        Self::new(PrimitiveConfig::default())
    }
}

impl MemoryPrimitive {
    /// Creates a primitive with the given limits.
    pub fn new(config: PrimitiveConfig) -> Self {
        Self {
            registry: Arc::new(Registry::default()),
            config,
        }
    }

    /// The limits this primitive enforces.
    pub const fn config(&self) -> &PrimitiveConfig {
        &self.config
    }

    /// Number of handles currently live.
    pub fn live_handles(&self) -> usize {
        self.registry.entries.lock().len()
    }
}

/// Rejects combinations a per-key schema cannot see.
fn check_combination(options: &OptionSet) -> Result<(), String> {
    for (wrapper, key) in NON_NEGATIVE {
        if let Some(value) = options.get(wrapper, key)
            && let Some(number) = value.as_float()
            && (number.is_nan() || number < 0.0)
        {
            return Err(format!("{wrapper}.{key} must be a non-negative number, got {value}"));
        }
    }

    if options.get("ssl", "SNI_server_name").is_some()
        && options.get("ssl", "SNI_enabled") == Some(&OptionValue::Bool(false))
    {
        return Err("ssl.SNI_server_name is set but ssl.SNI_enabled is false".to_string());
    }

    Ok(())
}

impl MemoryPrimitive {
    /// Allocates a handle. A registered `replacing` handle does not count
    /// against `max_handles`.
    fn allocate(
        &self,
        replacing: Option<HandleId>,
        options: &OptionSet,
        params: &Params,
    ) -> TransportResult<Handle> {
        if let Err(reason) = check_combination(options) {
            self.registry.metrics.record_refused();
            warn!(%reason, "refusing to create handle");
            return Err(TransportError::Refused(reason));
        }

        let id = HandleId::next();
        {
            let mut entries = self.registry.entries.lock();
            let reclaimable = replacing.is_some_and(|old| entries.contains_key(&old));
            if let Some(max) = self.config.max_handles
                && entries.len() - usize::from(reclaimable) >= max
            {
                self.registry.metrics.record_refused();
                return Err(TransportError::Exhausted { max });
            }
            entries.insert(
                id,
                Entry {
                    options: options.clone(),
                    params: params.clone(),
                },
            );
        }
        self.registry.metrics.record_created();
        debug!(handle = %id, "handle allocated");

        let releaser: Arc<dyn HandleRelease> = self.registry.clone();
        Ok(Handle::new(id, releaser))
    }
}

impl TransportPrimitive for MemoryPrimitive {
    fn create_handle(&self, options: &OptionSet, params: &Params) -> TransportResult<Handle> {
        self.allocate(None, options, params)
    }

    fn replace_handle(
        &self,
        replacing: &Handle,
        options: &OptionSet,
        params: &Params,
    ) -> TransportResult<Handle> {
        self.allocate(Some(replacing.id()), options, params)
    }

    fn read_options(&self, handle: &Handle) -> TransportResult<OptionSet> {
        self.registry
            .entries
            .lock()
            .get(&handle.id())
            .map(|entry| entry.options.clone())
            .ok_or(TransportError::UnknownHandle(handle.id()))
    }

    fn read_params(&self, handle: &Handle) -> TransportResult<Params> {
        self.registry
            .entries
            .lock()
            .get(&handle.id())
            .map(|entry| entry.params.clone())
            .ok_or(TransportError::UnknownHandle(handle.id()))
    }

    fn set_params(&self, handle: &Handle, params: &Params) -> bool {
        match self.registry.entries.lock().get_mut(&handle.id()) {
            Some(entry) => {
                entry
                    .params
                    .extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
                true
            }
            None => false,
        }
    }

    fn metrics(&self) -> PrimitiveMetrics {
        self.registry.metrics.snapshot()
    }
}
