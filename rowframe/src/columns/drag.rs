//! Scoped pointer-listener registration for column drags.
//!
//! While a column is being resized the host has to deliver pointer-move and
//! pointer-up events even when the pointer leaves the header. The listeners
//! that make this happen are owned by a [`DragSession`], which detaches them
//! in `Drop`, so every way a drag can end releases them.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, trace};

/// Pointer events a drag listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Move,
    Up,
}

/// Handle for an attached listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Host-side event plumbing for drags.
///
/// Renderers implement this over their own event system (document-level
/// mouse listeners, a captured pointer, terminal mouse mode, ...).
pub trait PointerListenerHost: Send + Sync {
    /// Start delivering `kind` events to the engine.
    fn attach(&self, kind: PointerEventKind) -> ListenerId;

    /// Stop delivering events for `id`.
    fn detach(&self, id: ListenerId);
}

/// In-process listener bookkeeping.
///
/// Hosts without a native listener concept can use this directly and poll
/// [`is_attached`](Self::is_attached) to decide whether to route pointer
/// events to the engine.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next: AtomicU64,
    active: Mutex<HashMap<ListenerId, PointerEventKind>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently attached listeners.
    pub fn active_count(&self) -> usize {
        self.active.lock().map(|g| g.len()).unwrap_or(0)
    }

    /// Whether a listener for `kind` is attached.
    pub fn is_attached(&self, kind: PointerEventKind) -> bool {
        self.active
            .lock()
            .map(|g| g.values().any(|k| *k == kind))
            .unwrap_or(false)
    }
}

impl PointerListenerHost for ListenerRegistry {
    fn attach(&self, kind: PointerEventKind) -> ListenerId {
        let id = ListenerId(self.next.fetch_add(1, Ordering::SeqCst));
        if let Ok(mut guard) = self.active.lock() {
            guard.insert(id, kind);
        }
        id
    }

    fn detach(&self, id: ListenerId) {
        if let Ok(mut guard) = self.active.lock() {
            guard.remove(&id);
        }
    }
}

/// An in-progress column drag.
///
/// Holds the pointer listeners for as long as it lives.
pub struct DragSession {
    host: Arc<dyn PointerListenerHost>,
    listeners: Vec<ListenerId>,
    /// Column being resized.
    pub column_id: String,
    /// Pointer x at drag start.
    pub start_x: i32,
    /// Column width at drag start.
    pub start_width: u32,
}

impl DragSession {
    pub(crate) fn begin(
        host: Arc<dyn PointerListenerHost>,
        column_id: String,
        start_x: i32,
        start_width: u32,
    ) -> Self {
        let listeners = vec![
            host.attach(PointerEventKind::Move),
            host.attach(PointerEventKind::Up),
        ];
        trace!("DragSession: attached {} listeners", listeners.len());
        Self {
            host,
            listeners,
            column_id,
            start_x,
            start_width,
        }
    }

    /// Width implied by the pointer at `x`, before clamping.
    pub(crate) fn raw_width(&self, x: i32) -> i64 {
        self.start_width as i64 + (x as i64 - self.start_x as i64)
    }
}

impl std::fmt::Debug for DragSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragSession")
            .field("column_id", &self.column_id)
            .field("start_x", &self.start_x)
            .field("start_width", &self.start_width)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Drop for DragSession {
    fn drop(&mut self) {
        for id in self.listeners.drain(..) {
            self.host.detach(id);
        }
        debug!("DragSession for '{}' released", self.column_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_attaches_and_detaches() {
        let registry = Arc::new(ListenerRegistry::new());
        {
            let session = DragSession::begin(registry.clone(), "name".into(), 10, 150);
            assert_eq!(registry.active_count(), 2);
            assert!(registry.is_attached(PointerEventKind::Move));
            assert!(registry.is_attached(PointerEventKind::Up));
            assert_eq!(session.raw_width(60), 200);
            assert_eq!(session.raw_width(-90), 50);
        }
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn test_listener_ids_are_unique() {
        let registry = ListenerRegistry::new();
        let a = registry.attach(PointerEventKind::Move);
        let b = registry.attach(PointerEventKind::Move);
        assert_ne!(a, b);
        registry.detach(a);
        assert_eq!(registry.active_count(), 1);
    }
}
