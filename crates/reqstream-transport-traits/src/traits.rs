//! Core transport primitive trait.

use crate::error::TransportResult;
use crate::handle::Handle;
use crate::metrics::PrimitiveMetrics;
use crate::value::{OptionSet, Params};

/// Materializes native transport handles from validated options.
///
/// The primitive is the boundary between the configuration core and the
/// layer that performs actual I/O. It is shared between contexts, so every
/// method takes `&self`.
pub trait TransportPrimitive: Send + Sync + std::fmt::Debug {
    /// Creates a handle from the full option set and params.
    ///
    /// The handle must capture `options` as they are at call time.
    fn create_handle(&self, options: &OptionSet, params: &Params) -> TransportResult<Handle>;

    /// Creates a handle that will take the place of `replacing`.
    ///
    /// `replacing` is released by the caller once the new handle exists.
    /// Primitives that cap the number of live handles should not count it
    /// against the cap. The default creates a handle as usual.
    fn replace_handle(
        &self,
        replacing: &Handle,
        options: &OptionSet,
        params: &Params,
    ) -> TransportResult<Handle> {
        let _ = replacing;
        self.create_handle(options, params)
    }

    /// Reads back the options a handle was created with.
    fn read_options(&self, handle: &Handle) -> TransportResult<OptionSet>;

    /// Reads back the params currently attached to a handle.
    fn read_params(&self, handle: &Handle) -> TransportResult<Params>;

    /// Attaches params to a live handle. Returns whether they were accepted.
    fn set_params(&self, handle: &Handle, params: &Params) -> bool;

    /// Returns a snapshot of the primitive's handle accounting.
    fn metrics(&self) -> PrimitiveMetrics {
        PrimitiveMetrics::default()
    }
}
