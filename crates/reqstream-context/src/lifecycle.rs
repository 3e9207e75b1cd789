//! Handle lifecycle state.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use reqstream_transport_traits::{Handle, HandleId, OptionSet, Params};

/// Represents the current state of a context's handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleState {
    /// No handle has been created yet.
    Uninitialized,
    /// A handle exists and is ready to hand to the transport layer.
    Ready {
        /// Identifier of the live handle.
        id: HandleId,
    },
}

impl HandleState {
    /// Returns `true` in the [`HandleState::Ready`] state.
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

impl fmt::Display for HandleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Ready { id } => write!(f, "ready({id})"),
        }
    }
}

/// Options and params used when a context creates its handle on demand.
///
/// Both parts default to empty, so `{"options": {...}}` alone is a valid
/// document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateOptions {
    /// Options merged before creation.
    pub options: OptionSet,
    /// Params merged before creation.
    pub params: Params,
}

impl CreateOptions {
    /// Creates fallback options with no params.
    pub fn with_options(options: OptionSet) -> Self {
        Self {
            options,
            params: Params::new(),
        }
    }
}

/// The single handle slot a context owns.
#[derive(Debug, Default)]
pub(crate) struct HandleSlot {
    handle: Option<Handle>,
}

impl HandleSlot {
    pub(crate) fn get(&self) -> Option<&Handle> {
        self.handle.as_ref()
    }

    pub(crate) fn state(&self) -> HandleState {
        match &self.handle {
            Some(handle) => HandleState::Ready { id: handle.id() },
            None => HandleState::Uninitialized,
        }
    }

    /// Stores `handle`, releasing the previous one.
    pub(crate) fn replace(&mut self, handle: Handle) -> &Handle {
        if let Some(old) = self.handle.take() {
            debug!(old = %old.id(), new = %handle.id(), "releasing replaced handle");
        }
        self.handle.insert(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_starts_uninitialized() {
        let slot = HandleSlot::default();
        assert_eq!(slot.state(), HandleState::Uninitialized);
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_slot_replace() {
        let mut slot = HandleSlot::default();
        let first = HandleId::next();
        let second = HandleId::next();

        slot.replace(Handle::detached(first));
        assert_eq!(slot.state(), HandleState::Ready { id: first });

        let current = slot.replace(Handle::detached(second)).id();
        assert_eq!(current, second);
        assert!(slot.state().is_ready());
    }

    #[test]
    fn test_create_options_from_partial_json() {
        let parsed: CreateOptions =
            serde_json::from_str(r#"{"options": {"http": {"method": "HEAD"}}}"#).unwrap();
        assert_eq!(parsed.options.len(), 1);
        assert!(parsed.params.is_empty());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(HandleState::Uninitialized.to_string(), "uninitialized");
    }
}
