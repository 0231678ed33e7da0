//! Live queries: registered windows that are recomputed after mutations.

use std::cell::RefCell;
use std::rc::Rc;

use crate::stream::registry::{Registry, SharedRegistry};
use crate::stream::Subscription;
use crate::types::{PeerId, SharedMediaQuery, SharedMediaResult, SharedMediaType};

type Consumer = Box<dyn FnMut(&SharedMediaResult)>;

pub(crate) struct LiveQuery {
    query: SharedMediaQuery,
    last: RefCell<Option<SharedMediaResult>>,
    consumer: RefCell<Consumer>,
}

impl LiveQuery {
    /// Deliver `result` unless it equals the last delivered value.
    fn push(&self, result: SharedMediaResult) {
        if self.last.borrow().as_ref() == Some(&result) {
            return;
        }
        log::debug!(
            "live query {}/{}@{} -> {} ids, total {:?}",
            self.query.key.peer_id,
            self.query.key.media_type,
            self.query.key.message_id,
            result.message_ids.len(),
            result.count
        );
        {
            let mut consumer = self
                .consumer
                .try_borrow_mut()
                .unwrap_or_else(|_| panic!("live query consumer re-entered during delivery"));
            (*consumer)(&result);
        }
        *self.last.borrow_mut() = Some(result);
    }
}

/// All live queries of one router.
pub(crate) struct LiveQueries {
    registry: SharedRegistry<LiveQuery>,
}

impl LiveQueries {
    pub(crate) fn new() -> Self {
        Self {
            registry: Registry::new_shared(),
        }
    }

    /// Deliver `initial` and keep the query registered while the returned
    /// handle lives.
    pub(crate) fn register(
        &self,
        query: SharedMediaQuery,
        initial: SharedMediaResult,
        consumer: impl FnMut(&SharedMediaResult) + 'static,
    ) -> Subscription {
        let live = Rc::new(LiveQuery {
            query,
            last: RefCell::new(None),
            consumer: RefCell::new(Box::new(consumer)),
        });
        live.push(initial);
        Registry::insert(&self.registry, live)
    }

    /// Recompute every live query on `peer_id` (restricted to `media_type`
    /// when given) and push the results that changed.
    pub(crate) fn refresh(
        &self,
        peer_id: PeerId,
        media_type: Option<SharedMediaType>,
        compute: impl Fn(&SharedMediaQuery) -> SharedMediaResult,
    ) {
        let targets = self.registry.borrow().snapshot_where(|live| {
            live.query.key.peer_id == peer_id
                && media_type.map_or(true, |t| t == live.query.key.media_type)
        });
        for (id, live) in targets {
            if !self.registry.borrow().contains(id) {
                continue;
            }
            live.push(compute(&live.query));
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.registry.borrow().len()
    }
}
