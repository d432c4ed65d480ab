//! Event: Ordered, append-only observer lists.
//!
//! Screens expose their resize, keypress, and update streams as
//! [`Event`]s. Firing is plain synchronous iteration in subscription
//! order on the caller's thread; there is no hidden dispatch and no
//! unsubscription (a deliberate simplification, not an omission).
//!
//! The subscriber list is guarded by its own lock, but observers are
//! invoked from a snapshot, after the lock has been released. An
//! observer may therefore call back into the screen that fired it,
//! e.g. to register another window or stop the loop.

use std::sync::{Arc, Mutex, PoisonError};

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// An ordered list of observer callbacks for one event stream.
pub struct Event<T> {
    subscribers: Mutex<Vec<Subscriber<T>>>,
}

impl<T> Event<T> {
    /// Create an event with no subscribers.
    pub const fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Append an observer. Observers fire in subscription order and
    /// cannot be removed.
    pub fn subscribe(&self, observer: impl Fn(&T) + Send + Sync + 'static) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(observer));
    }

    /// Fire the event, invoking every observer synchronously in
    /// subscription order. Observers run outside the subscriber lock.
    pub fn fire(&self, payload: &T) {
        let snapshot: Vec<Subscriber<T>> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for observer in snapshot {
            observer(payload);
        }
    }

    /// Number of registered observers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<T> Default for Event<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
