//! Signal/Slot: typed publish-subscribe with weakly-held subscribers.
//!
//! A [`Slot`] wraps a receiver callback and is held by shared ownership
//! (`Rc<Slot<T>>`) by whoever is interested in the notifications. A [`Signal`]
//! only keeps `Weak` references, so dropping the last `Rc` is all it takes to
//! unsubscribe. Dead entries are pruned lazily; they are never an error.
//!
//! Everything is single-threaded and synchronous: `transmit` calls each live
//! receiver in connection order before returning. The subscriber list is not
//! borrowed while receivers run, so a receiver may connect, disconnect or
//! transmit on the same signal.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// A receiver for values of type `T`.
pub struct Slot<T> {
    receiver: RefCell<Box<dyn FnMut(T)>>,
    connections: Cell<usize>,
}

impl<T> Slot<T> {
    /// Create a new shared slot around `receiver`.
    pub fn new(receiver: impl FnMut(T) + 'static) -> Rc<Self> {
        Rc::new(Self {
            receiver: RefCell::new(Box::new(receiver)),
            connections: Cell::new(0),
        })
    }

    /// Whether the slot is currently connected to at least one signal.
    pub fn is_connected(&self) -> bool {
        self.connections.get() > 0
    }

    /// Number of signals the slot is connected to.
    pub fn connection_count(&self) -> usize {
        self.connections.get()
    }

    fn attach(&self) {
        self.connections.set(self.connections.get() + 1);
    }

    fn detach(&self) {
        self.connections.set(self.connections.get().saturating_sub(1));
    }

    /// Deliver `value` to the receiver.
    ///
    /// A slot that is already running (re-entrant delivery) skips the value.
    pub fn receive(&self, value: T) {
        match self.receiver.try_borrow_mut() {
            Ok(mut receiver) => receiver(value),
            Err(_) => log::warn!("slot re-entered while running; value dropped"),
        }
    }
}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("connections", &self.connections.get())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Signal
// ---------------------------------------------------------------------------

type ConnectingFn<T> = Box<dyn Fn(&Signal<T>)>;

/// An emitter of values of type `T`.
pub struct Signal<T> {
    slots: RefCell<Vec<Weak<Slot<T>>>>,
    connecting: Option<ConnectingFn<T>>,
}

impl<T: Clone> Signal<T> {
    /// Create a signal with no subscribers.
    pub fn new() -> Self {
        Self {
            slots: RefCell::new(Vec::new()),
            connecting: None,
        }
    }

    /// Create a signal whose `connecting` callback runs each time a new slot
    /// joins. The callback typically calls [`transmit_last_connected`] to
    /// bring the newcomer up to date.
    ///
    /// [`transmit_last_connected`]: Signal::transmit_last_connected
    pub fn with_connecting(callback: impl Fn(&Signal<T>) + 'static) -> Self {
        Self {
            slots: RefCell::new(Vec::new()),
            connecting: Some(Box::new(callback)),
        }
    }

    /// Connect `slot`. Re-connecting a live, already connected slot is a no-op.
    pub fn connect(&self, slot: &Rc<Slot<T>>) {
        {
            let mut slots = self.slots.borrow_mut();
            groom(&mut slots);
            let target = Rc::downgrade(slot);
            if slots.iter().any(|s| Weak::ptr_eq(s, &target)) {
                return;
            }
            slots.push(target);
        }
        slot.attach();

        if let Some(callback) = &self.connecting {
            callback(self);
        }
    }

    /// Disconnect `slot`. No-op when it is absent.
    pub fn disconnect(&self, slot: &Rc<Slot<T>>) {
        let target = Rc::downgrade(slot);
        let mut slots = self.slots.borrow_mut();
        let present = slots.iter().any(|s| Weak::ptr_eq(s, &target));
        slots.retain(|s| !Weak::ptr_eq(s, &target) && s.strong_count() > 0);
        if present {
            slot.detach();
        }
    }

    /// Send `value` to every live slot in connection order.
    pub fn transmit(&self, value: T) {
        let live: Vec<Rc<Slot<T>>> = {
            let mut slots = self.slots.borrow_mut();
            let mut live = Vec::with_capacity(slots.len());
            slots.retain(|weak| match weak.upgrade() {
                Some(slot) => {
                    live.push(slot);
                    true
                }
                None => false,
            });
            live
        };

        for slot in live {
            slot.receive(value.clone());
        }
    }

    /// Send `value` only to the most recently connected live slot.
    pub fn transmit_last_connected(&self, value: T) {
        let last = {
            let mut slots = self.slots.borrow_mut();
            groom(&mut slots);
            slots.last().and_then(Weak::upgrade)
        };
        if let Some(slot) = last {
            slot.receive(value);
        }
    }

    /// Number of live connected slots.
    pub fn len(&self) -> usize {
        self.slots
            .borrow()
            .iter()
            .filter(|s| s.strong_count() > 0)
            .count()
    }

    /// Whether no live slot is connected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.borrow().len())
            .field("connecting", &self.connecting.is_some())
            .finish()
    }
}

impl<T> Drop for Signal<T> {
    fn drop(&mut self) {
        for slot in self.slots.get_mut().drain(..).filter_map(|s| s.upgrade()) {
            slot.detach();
        }
    }
}

/// Drop expired entries.
fn groom<T>(slots: &mut Vec<Weak<Slot<T>>>) {
    slots.retain(|s| s.strong_count() > 0);
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&'static str) -> Rc<Slot<i32>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log2 = Rc::clone(&log);
        let make = move |name: &'static str| {
            let log = Rc::clone(&log2);
            Slot::new(move |v: i32| log.borrow_mut().push(format!("{name}:{v}")))
        };
        (log, make)
    }

    #[test]
    fn transmit_in_connection_order() {
        let (log, make) = recorder();
        let a = make("a");
        let b = make("b");
        let signal = Signal::new();
        signal.connect(&a);
        signal.connect(&b);
        signal.transmit(7);
        assert_eq!(*log.borrow(), vec!["a:7", "b:7"]);
    }

    #[test]
    fn connect_is_idempotent() {
        let (log, make) = recorder();
        let a = make("a");
        let signal = Signal::new();
        signal.connect(&a);
        signal.connect(&a);
        assert_eq!(signal.len(), 1);
        signal.transmit(1);
        assert_eq!(*log.borrow(), vec!["a:1"]);
    }

    #[test]
    fn expired_slots_are_pruned() {
        let (log, make) = recorder();
        let a = make("a");
        let b = make("b");
        let signal = Signal::new();
        signal.connect(&a);
        signal.connect(&b);
        drop(a);
        signal.transmit(3);
        assert_eq!(*log.borrow(), vec!["b:3"]);
        assert_eq!(signal.slots.borrow().len(), 1);
    }

    #[test]
    fn disconnect_removes_slot() {
        let (log, make) = recorder();
        let a = make("a");
        let signal = Signal::new();
        signal.connect(&a);
        assert!(a.is_connected());
        signal.disconnect(&a);
        assert!(!a.is_connected());
        signal.transmit(9);
        assert!(log.borrow().is_empty());

        // Disconnecting again is a no-op.
        signal.disconnect(&a);
        assert!(signal.is_empty());
    }

    #[test]
    fn slot_stays_connected_while_any_signal_holds_it() {
        let (_log, make) = recorder();
        let a = make("a");
        let first = Signal::new();
        let second = Signal::new();
        first.connect(&a);
        second.connect(&a);
        first.connect(&a);
        assert_eq!(a.connection_count(), 2);

        first.disconnect(&a);
        assert!(a.is_connected());
        drop(second);
        assert!(!a.is_connected());
        assert_eq!(a.connection_count(), 0);
    }

    #[test]
    fn transmit_last_connected_only_reaches_newest() {
        let (log, make) = recorder();
        let a = make("a");
        let b = make("b");
        let signal = Signal::new();
        signal.connect(&a);
        signal.connect(&b);
        signal.transmit_last_connected(5);
        assert_eq!(*log.borrow(), vec!["b:5"]);
    }

    #[test]
    fn transmit_last_connected_skips_dead_tail() {
        let (log, make) = recorder();
        let a = make("a");
        let b = make("b");
        let signal = Signal::new();
        signal.connect(&a);
        signal.connect(&b);
        drop(b);
        signal.transmit_last_connected(2);
        assert_eq!(*log.borrow(), vec!["a:2"]);
    }

    #[test]
    fn connecting_callback_catches_up_newcomers() {
        let (log, make) = recorder();
        let state = Rc::new(Cell::new(42));
        let current = Rc::clone(&state);
        let signal = Signal::with_connecting(move |s: &Signal<i32>| {
            s.transmit_last_connected(current.get());
        });

        let a = make("a");
        signal.connect(&a);
        state.set(43);
        let b = make("b");
        signal.connect(&b);
        // Re-connecting does not fire the callback again.
        signal.connect(&b);

        assert_eq!(*log.borrow(), vec!["a:42", "b:43"]);
    }

    #[test]
    fn receiver_may_disconnect_itself_during_transmit() {
        let signal = Rc::new(Signal::<i32>::new());
        let hits = Rc::new(Cell::new(0));
        let holder: Rc<RefCell<Option<Rc<Slot<i32>>>>> = Rc::new(RefCell::new(None));

        let sig = Rc::clone(&signal);
        let h = Rc::clone(&hits);
        let me = Rc::clone(&holder);
        let slot = Slot::new(move |_| {
            h.set(h.get() + 1);
            if let Some(this) = me.borrow().as_ref() {
                sig.disconnect(this);
            }
        });
        *holder.borrow_mut() = Some(Rc::clone(&slot));

        signal.connect(&slot);
        signal.transmit(1);
        signal.transmit(2);
        assert_eq!(hits.get(), 1);
    }
}
