//! Capture-phase pointer listener registry
//!
//! Listeners run before the regular input handler sees a pointer-down.
//! Registration is tied to a [`Subscription`]: dropping it removes the
//! listener, so an overlay's listener lives exactly as long as the overlay
//! is open.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use ratatui::layout::Position;

/// What a listener wants after handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerControl {
    Keep,
    Remove,
}

type Listener = Box<dyn FnMut(Position) -> ListenerControl>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    /// Set while listeners are detached for dispatch
    dispatching: bool,
    /// Ids unsubscribed mid-dispatch
    cancelled: Vec<u64>,
}

impl Registry {
    fn remove(&mut self, id: u64) {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        if self.listeners.len() == before && self.dispatching {
            self.cancelled.push(id);
        }
    }
}

/// Shared handle to the pointer-down listener registry (single-threaded)
#[derive(Clone, Default)]
pub struct PointerBus {
    registry: Rc<RefCell<Registry>>,
}

impl PointerBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(Position) -> ListenerControl + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Box::new(listener)));
        tracing::trace!("Pointer listener {} registered", id);

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Deliver a pointer-down to every listener. Returns how many ran.
    pub fn dispatch(&self, at: Position) -> usize {
        // Listeners are detached while running so they may subscribe or drop
        // subscriptions without re-borrowing the registry.
        let mut active = {
            let mut registry = self.registry.borrow_mut();
            registry.dispatching = true;
            std::mem::take(&mut registry.listeners)
        };

        let mut invoked = 0;
        let mut removed = Vec::new();
        for (id, listener) in active.iter_mut() {
            if self.registry.borrow().cancelled.contains(id) {
                continue;
            }
            invoked += 1;
            if listener(at) == ListenerControl::Remove {
                removed.push(*id);
            }
        }

        let mut registry = self.registry.borrow_mut();
        registry.dispatching = false;
        let cancelled = std::mem::take(&mut registry.cancelled);
        active.retain(|(id, _)| !removed.contains(id) && !cancelled.contains(id));
        for id in &removed {
            tracing::trace!("Pointer listener {} removed itself", id);
        }

        let added = std::mem::replace(&mut registry.listeners, active);
        registry.listeners.extend(added);
        invoked
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Registration handle. The listener is removed when this is dropped.
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Whether the listener is still registered
    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|r| r.borrow().listeners.iter().any(|(id, _)| *id == self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
