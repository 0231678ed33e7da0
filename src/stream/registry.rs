//! Id-keyed subscriber storage shared by event streams and live queries.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::subscription::Subscription;

/// Registered entries in subscription order.
pub(crate) struct Registry<E: ?Sized> {
    next_id: u64,
    entries: Vec<(u64, Rc<E>)>,
}

pub(crate) type SharedRegistry<E> = Rc<RefCell<Registry<E>>>;

impl<E: ?Sized + 'static> Registry<E> {
    pub(crate) fn new_shared() -> SharedRegistry<E> {
        Rc::new(RefCell::new(Self {
            next_id: 0,
            entries: Vec::new(),
        }))
    }

    /// Register an entry. The returned handle removes it when dropped.
    pub(crate) fn insert(registry: &SharedRegistry<E>, entry: Rc<E>) -> Subscription {
        let id = {
            let mut inner = registry.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.entries.push((id, entry));
            id
        };
        let weak: Weak<RefCell<Registry<E>>> = Rc::downgrade(registry);
        Subscription::new(move || {
            if let Some(registry) = weak.upgrade() {
                registry.borrow_mut().remove(id);
            }
        })
    }

    fn remove(&mut self, id: u64) {
        self.entries.retain(|(entry_id, _)| *entry_id != id);
    }

    /// Copy of the current entries. Delivery iterates the copy so entries
    /// may be added or released while it runs.
    pub(crate) fn snapshot(&self) -> Vec<(u64, Rc<E>)> {
        self.entries.clone()
    }

    /// Copy of the entries accepted by `filter`.
    pub(crate) fn snapshot_where(&self, filter: impl Fn(&E) -> bool) -> Vec<(u64, Rc<E>)> {
        self.entries
            .iter()
            .filter(|(_, entry)| filter(&**entry))
            .cloned()
            .collect()
    }

    pub(crate) fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
