//! Opaque transport handles.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandleId(u64);

impl HandleId {
    /// Allocates a fresh identifier. Identifiers are never reused within a process.
    pub fn next() -> Self {
        Self(NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric identifier.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle#{}", self.0)
    }
}

/// Releases the resources behind a handle.
///
/// Implemented by primitives that keep per-handle state. Called exactly once,
/// when the owning [`Handle`] is dropped.
pub trait HandleRelease: Send + Sync {
    /// Frees everything associated with `id`.
    fn release(&self, id: HandleId);
}

/// An opaque, exclusively-owned transport handle.
///
/// Dropping the handle releases it through the primitive that created it.
pub struct Handle {
    id: HandleId,
    releaser: Option<Arc<dyn HandleRelease>>,
}

impl Handle {
    /// Creates a handle that is released through `releaser` on drop.
    pub fn new(id: HandleId, releaser: Arc<dyn HandleRelease>) -> Self {
        Self {
            id,
            releaser: Some(releaser),
        }
    }

    /// Creates a handle with no release hook.
    pub fn detached(id: HandleId) -> Self {
        Self { id, releaser: None }
    }

    /// Returns the handle identifier.
    pub const fn id(&self) -> HandleId {
        self.id
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("id", &self.id)
            .field("releasable", &self.releaser.is_some())
            .finish()
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if let Some(releaser) = self.releaser.take() {
            releaser.release(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<HandleId>>);

    impl HandleRelease for Recorder {
        fn release(&self, id: HandleId) {
            self.0.lock().push(id);
        }
    }

    #[test]
    fn test_handle_ids_are_unique() {
        let a = HandleId::next();
        let b = HandleId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_drop_releases_once() {
        let recorder = Arc::new(Recorder::default());
        let id = HandleId::next();
        {
            let _handle = Handle::new(id, recorder.clone());
        }
        assert_eq!(*recorder.0.lock(), vec![id]);
    }

    #[test]
    fn test_detached_handle_display() {
        let handle = Handle::detached(HandleId::next());
        assert!(handle.id().to_string().starts_with("handle#"));
    }
}
