use std::cell::Cell;
use std::rc::Rc;

/// Shared render request counter.
///
/// Writers (joint engine, camera controller) bump the version; the render
/// loop holds a [`RedrawWatcher`] and draws when it sees a newer version.
/// Single-threaded by construction, like the rest of the viewer state.
#[derive(Debug, Clone, Default)]
pub struct RedrawRequest {
    version: Rc<Cell<u64>>,
}

impl RedrawRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the scene as needing a render.
    pub fn request(&self) {
        self.version.set(self.version.get().wrapping_add(1));
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    /// A watcher that has seen every request made so far.
    #[must_use]
    pub fn watcher(&self) -> RedrawWatcher {
        RedrawWatcher {
            request: self.clone(),
            seen: self.version(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RedrawWatcher {
    request: RedrawRequest,
    seen: u64,
}

impl RedrawWatcher {
    /// Returns `true` once per batch of requests made since the last call.
    pub fn take(&mut self) -> bool {
        let current = self.request.version();
        let pending = current != self.seen;
        self.seen = current;
        pending
    }
}
