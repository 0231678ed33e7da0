//! Push-based, single-threaded event stream.

use std::cell::RefCell;
use std::rc::Rc;

use super::registry::{Registry, SharedRegistry};
use super::subscription::Subscription;

type Callback<T> = RefCell<dyn FnMut(&T)>;

/// Delivers every fired value to the current subscribers, synchronously
/// and in subscription order.
///
/// Clones share one subscriber list. Firing a stream again from inside one
/// of its own callbacks is a programming error and panics.
pub struct EventStream<T> {
    subscribers: SharedRegistry<Callback<T>>,
}

impl<T: 'static> EventStream<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Registry::new_shared(),
        }
    }

    /// Register a callback. It stays registered while the returned handle lives.
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> Subscription {
        let callback: Rc<Callback<T>> = Rc::new(RefCell::new(callback));
        Registry::insert(&self.subscribers, callback)
    }

    pub(crate) fn fire(&self, value: &T) {
        let snapshot = self.subscribers.borrow().snapshot();
        for (id, callback) in snapshot {
            // Released by an earlier callback of this same delivery.
            if !self.subscribers.borrow().contains(id) {
                continue;
            }
            let mut guard = callback
                .try_borrow_mut()
                .unwrap_or_else(|_| panic!("event stream fired re-entrantly from its own callback"));
            (*guard)(value);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    pub fn has_subscribers(&self) -> bool {
        self.subscriber_count() > 0
    }
}

impl<T: 'static> Default for EventStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EventStream<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}
