//! Change notification primitive.
//!
//! This module provides:
//! - `Changed` - payload of the "changed" event a widget emits after a mutation
//! - `Emitter` - ordered, synchronous listener list
//! - `SubscriptionId` - handle used to remove a single listener

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::SliceKind;

/// Emitted once per discrete mutation, after the entity slice was updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Changed {
    /// Number of the mutated entity
    pub entity: u32,
    /// Mutated slice
    pub slice: SliceKind,
}

/// Listener registration handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener<E> = Rc<RefCell<dyn FnMut(&E)>>;

/// Synchronous event emitter.
///
/// Listeners run on the caller's thread, in registration order, before
/// `emit` returns. All methods take `&self` and the listener list is not
/// borrowed while listeners run, so a listener may subscribe, unsubscribe
/// or clear the emitter it is called from. Removed listeners that have not
/// run yet are skipped; listeners added during an emit see the next event.
/// A listener is never re-entered by a nested emit.
pub struct Emitter<E> {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, Listener<E>)>>,
}

impl<E> Emitter<E> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Register a listener.
    pub fn subscribe(&self, listener: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let listener: Listener<E> = Rc::new(RefCell::new(listener));
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    /// Remove all listeners, returning how many were dropped.
    pub fn clear(&self) -> usize {
        std::mem::take(&mut *self.listeners.borrow_mut()).len()
    }

    /// Deliver an event to every listener. Returns the number of listeners called.
    pub fn emit(&self, event: &E) -> usize {
        let snapshot = self.listeners.borrow().clone();
        let mut delivered = 0;
        for (id, listener) in snapshot {
            if !self.is_subscribed(id) {
                continue;
            }
            let Ok(mut listener) = listener.try_borrow_mut() else {
                continue;
            };
            (&mut *listener)(event);
            delivered += 1;
        }
        delivered
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow().iter().any(|(sid, _)| *sid == id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changed() -> Changed {
        Changed {
            entity: 1,
            slice: SliceKind::Modules,
        }
    }

    #[test]
    fn test_emit_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let emitter = Emitter::new();

        for tag in ["a", "b", "c"] {
            let log = log.clone();
            emitter.subscribe(move |_: &Changed| log.borrow_mut().push(tag));
        }

        assert_eq!(emitter.emit(&changed()), 3);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unsubscribe_single_listener() {
        let hits = Rc::new(RefCell::new(0));
        let emitter = Emitter::new();

        let h = hits.clone();
        let first = emitter.subscribe(move |_: &Changed| *h.borrow_mut() += 1);
        let h = hits.clone();
        emitter.subscribe(move |_: &Changed| *h.borrow_mut() += 10);

        assert!(emitter.unsubscribe(first));
        assert!(!emitter.unsubscribe(first));

        emitter.emit(&changed());
        assert_eq!(*hits.borrow(), 10);
    }

    #[test]
    fn test_clear_stops_delivery() {
        let hits = Rc::new(RefCell::new(0));
        let emitter = Emitter::new();
        let h = hits.clone();
        emitter.subscribe(move |_: &Changed| *h.borrow_mut() += 1);

        assert_eq!(emitter.clear(), 1);
        assert_eq!(emitter.emit(&changed()), 0);
        assert_eq!(*hits.borrow(), 0);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let emitter: Emitter<Changed> = Emitter::new();
        let a = emitter.subscribe(|_| {});
        emitter.unsubscribe(a);
        let b = emitter.subscribe(|_| {});
        assert_ne!(a, b);
    }

    #[test]
    fn test_listener_may_unsubscribe_during_emit() {
        let emitter = Rc::new(Emitter::new());
        let hits = Rc::new(RefCell::new(Vec::new()));

        let id = Rc::new(Cell::new(None));
        let (em, h, own) = (emitter.clone(), hits.clone(), id.clone());
        id.set(Some(emitter.subscribe(move |_: &Changed| {
            h.borrow_mut().push("once");
            if let Some(own) = own.get() {
                em.unsubscribe(own);
            }
        })));
        let h = hits.clone();
        emitter.subscribe(move |_: &Changed| h.borrow_mut().push("always"));

        assert_eq!(emitter.emit(&changed()), 2);
        assert_eq!(emitter.emit(&changed()), 1);
        assert_eq!(*hits.borrow(), vec!["once", "always", "always"]);
    }

    #[test]
    fn test_clear_during_emit_skips_remaining_listeners() {
        let emitter = Rc::new(Emitter::new());
        let hits = Rc::new(Cell::new(0));

        let em = emitter.clone();
        emitter.subscribe(move |_: &Changed| {
            em.clear();
        });
        let h = hits.clone();
        emitter.subscribe(move |_: &Changed| h.set(h.get() + 1));

        assert_eq!(emitter.emit(&changed()), 1);
        assert_eq!(hits.get(), 0);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_nested_emit_does_not_reenter_listener() {
        let emitter = Rc::new(Emitter::new());
        let depth = Rc::new(Cell::new(0));

        let (em, d) = (emitter.clone(), depth.clone());
        emitter.subscribe(move |c: &Changed| {
            d.set(d.get() + 1);
            em.emit(c);
        });

        assert_eq!(emitter.emit(&changed()), 1);
        assert_eq!(depth.get(), 1);
    }
}
