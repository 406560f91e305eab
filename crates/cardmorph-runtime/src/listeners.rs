#![forbid(unsafe_code)]

//! Global listener registry.
//!
//! Stands in for the host's window-level `keydown`/`resize` listener table.
//! A morph attaches listeners through [`ListenerRegistry::attach`] and holds
//! the returned [`ListenerGuard`]s; dropping a guard detaches its listener.
//! Teardown therefore cannot be forgotten on any exit path: when the
//! instance (or just its guard list) is dropped, the registry is clean.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use cardmorph_core::event::ListenerKind;

/// Identity of one attached listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Debug, Default)]
struct RegistryState {
    next_id: u64,
    attached: BTreeMap<ListenerId, ListenerKind>,
    total_attached: u64,
}

/// Shared registry handle; clones share state.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<RegistryState>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener of `kind`.
    #[must_use = "dropping the guard detaches the listener"]
    pub fn attach(&self, kind: ListenerKind) -> ListenerGuard {
        let mut state = self.inner.borrow_mut();
        state.next_id += 1;
        let id = ListenerId(state.next_id);
        state.attached.insert(id, kind);
        state.total_attached += 1;
        tracing::trace!(listener = id.0, ?kind, "listener attached");
        ListenerGuard {
            registry: self.clone(),
            id,
            kind,
        }
    }

    /// Number of attached listeners of `kind`.
    pub fn count(&self, kind: ListenerKind) -> usize {
        self.inner.borrow().attached.values().filter(|k| **k == kind).count()
    }

    /// Number of attached listeners of any kind.
    pub fn len(&self) -> usize {
        self.inner.borrow().attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().attached.is_empty()
    }

    /// Whether `id` is attached.
    pub fn is_attached(&self, id: ListenerId) -> bool {
        self.inner.borrow().attached.contains_key(&id)
    }

    /// Listeners ever attached, including detached ones.
    pub fn total_attached(&self) -> u64 {
        self.inner.borrow().total_attached
    }

    fn detach(&self, id: ListenerId) {
        if let Some(kind) = self.inner.borrow_mut().attached.remove(&id) {
            tracing::trace!(listener = id.0, ?kind, "listener detached");
        }
    }
}

/// Keeps one listener attached for as long as it lives.
#[derive(Debug)]
pub struct ListenerGuard {
    registry: ListenerRegistry,
    id: ListenerId,
    kind: ListenerKind,
}

impl ListenerGuard {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn kind(&self) -> ListenerKind {
        self.kind
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.registry.detach(self.id);
    }
}
