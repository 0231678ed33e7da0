//! Applies script lines to a [`SharedMedia`] and records what it reports.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::MediaConfig;
use crate::engine::SharedMedia;
use crate::stream::{Lifetime, Subscription};
use crate::types::{
    SharedMediaKey, SharedMediaQuery, SharedMediaRemoveAll, SharedMediaRemoveOne,
    SharedMediaResult, SharedMediaSliceUpdate,
};

use super::script::{ScriptLine, ScriptOp, ScriptQuery};

/// Something observed during a replay, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayEntry {
    SliceUpdated(SharedMediaSliceUpdate),
    OneRemoved(SharedMediaRemoveOne),
    AllRemoved(SharedMediaRemoveAll),
    /// A query answer; `line` is the script line that opened the query.
    QueryResult {
        line: usize,
        query: SharedMediaQuery,
        result: SharedMediaResult,
    },
}

/// Drives a [`SharedMedia`] from script lines.
pub struct Replay {
    media: SharedMedia,
    entries: Rc<RefCell<Vec<ReplayEntry>>>,
    live_queries: Vec<Subscription>,
    _lifetime: Lifetime,
}

impl Replay {
    pub fn new(config: MediaConfig) -> Self {
        let media = SharedMedia::with_config(config);
        let entries: Rc<RefCell<Vec<ReplayEntry>>> = Rc::new(RefCell::new(Vec::new()));
        let mut lifetime = Lifetime::new();

        let sink = Rc::clone(&entries);
        lifetime.add(media.slice_updated().subscribe(move |update| {
            sink.borrow_mut()
                .push(ReplayEntry::SliceUpdated(update.clone()));
        }));
        let sink = Rc::clone(&entries);
        lifetime.add(media.one_removed().subscribe(move |event| {
            sink.borrow_mut().push(ReplayEntry::OneRemoved(event.clone()));
        }));
        let sink = Rc::clone(&entries);
        lifetime.add(media.all_removed().subscribe(move |event| {
            sink.borrow_mut().push(ReplayEntry::AllRemoved(*event));
        }));

        Self {
            media,
            entries,
            live_queries: Vec::new(),
            _lifetime: lifetime,
        }
    }

    /// Apply every line in order.
    pub fn run(&mut self, lines: Vec<ScriptLine>) {
        let total = lines.len();
        for ScriptLine { line, op } in lines {
            self.apply(line, op);
        }
        log::info!(
            "replayed {} lines, {} conversations indexed",
            total,
            self.media.peers().count()
        );
    }

    pub fn apply(&mut self, line: usize, op: ScriptOp) {
        log::debug!("line {}: {:?}", line, op);
        match op {
            ScriptOp::AddNew(event) => self.media.add_new(event),
            ScriptOp::AddExisting(event) => self.media.add_existing(event),
            ScriptOp::AddSlice(event) => self.media.add_slice(event),
            ScriptOp::RemoveOne(event) => self.media.remove_one(event),
            ScriptOp::RemoveAll(event) => self.media.remove_all(event),
            ScriptOp::Query(query) => self.open_query(line, query),
        }
    }

    /// Resolve a script query against the configured default limits.
    pub fn resolve_query(&self, query: &ScriptQuery) -> SharedMediaQuery {
        let config = self.media.config();
        SharedMediaQuery::new(
            SharedMediaKey::new(query.peer_id, query.media_type, query.message_id),
            query.limit_before.unwrap_or(config.default_limit_before),
            query.limit_after.unwrap_or(config.default_limit_after),
        )
    }

    fn open_query(&mut self, line: usize, query: ScriptQuery) {
        let resolved = self.resolve_query(&query);
        if !query.live {
            let result = self.media.query_snapshot(&resolved);
            self.entries.borrow_mut().push(ReplayEntry::QueryResult {
                line,
                query: resolved,
                result,
            });
            return;
        }
        let sink = Rc::clone(&self.entries);
        let subscription = self.media.query(resolved, move |result| {
            sink.borrow_mut().push(ReplayEntry::QueryResult {
                line,
                query: resolved,
                result: result.clone(),
            });
        });
        self.live_queries.push(subscription);
    }

    pub fn media(&self) -> &SharedMedia {
        &self.media
    }

    /// Everything observed so far, leaving the log empty.
    pub fn take_entries(&mut self) -> Vec<ReplayEntry> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }
}
