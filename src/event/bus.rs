use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Callback registered on an [`EventBus`]
pub type Listener<T> = Box<dyn Fn(&T)>;

struct Slot<T> {
    id: usize,
    active: Cell<bool>,
    callback: Listener<T>,
}

struct Slots<T> {
    slots: RefCell<Vec<Rc<Slot<T>>>>,
    next_id: Cell<usize>,
}

/// A simple event bus for broadcasting values to registered listeners.
///
/// Dispatch runs over a snapshot of the listeners, so a callback may
/// subscribe, unsubscribe or emit again without tripping the `RefCell`.
pub struct EventBus<T> {
    inner: Rc<Slots<T>>,
}

impl<T> fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &format!("<{} listeners>", self.listener_count()))
            .finish()
    }
}

impl<T: 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventBus<T> {
    /// Number of listeners currently registered
    pub fn listener_count(&self) -> usize {
        self.inner.slots.borrow().len()
    }
}

impl<T: 'static> EventBus<T> {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Slots {
                slots: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Subscribe a listener to receive every value emitted from now on
    pub fn subscribe(&self, callback: Listener<T>) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        let slot = Rc::new(Slot {
            id,
            active: Cell::new(true),
            callback,
        });
        self.inner.slots.borrow_mut().push(Rc::clone(&slot));

        let slots = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            slot.active.set(false);
            if let Some(inner) = slots.upgrade() {
                inner.slots.borrow_mut().retain(|s| s.id != id);
            }
        })
    }

    /// Emit a value to all registered listeners, in registration order
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Rc<Slot<T>>> = self.inner.slots.borrow().iter().cloned().collect();
        for slot in snapshot {
            // Removed by an earlier listener during this dispatch
            if slot.active.get() {
                (slot.callback)(value);
            }
        }
    }
}

/// Handle to one listener registration.
///
/// Dropping the handle leaves the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// Removes the listener. Does nothing if the bus is already gone.
    pub fn unsubscribe(mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("open", &self.teardown.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<u32>>>, Listener<u32>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let listener: Listener<u32> = Box::new(move |v| sink.borrow_mut().push(*v));
        (seen, listener)
    }

    #[test]
    fn delivers_in_emission_order() {
        let bus = EventBus::new();
        let (seen, listener) = recorder();
        let _sub = bus.subscribe(listener);

        bus.emit(&1);
        bus.emit(&2);
        bus.emit(&3);

        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let (seen, listener) = recorder();
        let sub = bus.subscribe(listener);

        bus.emit(&1);
        sub.unsubscribe();
        bus.emit(&2);

        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn dropping_subscription_keeps_listener() {
        let bus = EventBus::new();
        let (seen, listener) = recorder();
        drop(bus.subscribe(listener));

        bus.emit(&7);

        assert_eq!(*seen.borrow(), vec![7]);
        assert_eq!(bus.listener_count(), 1);
    }

    #[test]
    fn unsubscribe_after_bus_dropped_is_noop() {
        let bus = EventBus::<u32>::new();
        let sub = bus.subscribe(Box::new(|_| {}));
        drop(bus);
        sub.unsubscribe();
    }

    #[test]
    fn listener_can_subscribe_during_emit() {
        let bus = Rc::new(EventBus::<u32>::new());
        let late_hits = Rc::new(Cell::new(0));

        let bus_ref = Rc::downgrade(&bus);
        let hits = Rc::clone(&late_hits);
        let _outer = bus.subscribe(Box::new(move |_| {
            if let Some(bus) = bus_ref.upgrade() {
                let hits = Rc::clone(&hits);
                drop(bus.subscribe(Box::new(move |_| hits.set(hits.get() + 1))));
            }
        }));

        // The listener added mid-dispatch only sees later emissions
        bus.emit(&1);
        assert_eq!(late_hits.get(), 0);
        bus.emit(&2);
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn listener_removed_mid_dispatch_is_skipped() {
        let bus = EventBus::<u32>::new();
        let (seen, listener) = recorder();

        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let handle = Rc::clone(&victim);
        let _first = bus.subscribe(Box::new(move |_| {
            if let Some(sub) = handle.borrow_mut().take() {
                sub.unsubscribe();
            }
        }));
        *victim.borrow_mut() = Some(bus.subscribe(listener));

        bus.emit(&1);

        assert!(seen.borrow().is_empty());
        assert_eq!(bus.listener_count(), 1);
    }
}
