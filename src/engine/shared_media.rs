//! Router from (conversation, media type) to the list that indexes it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::MediaConfig;
use crate::index::SharedMediaList;
use crate::stream::{EventStream, Lifetime, Subscription};
use crate::types::{
    MsgId, PeerId, SharedMediaAddExisting, SharedMediaAddNew, SharedMediaAddSlice,
    SharedMediaQuery, SharedMediaRemoveAll, SharedMediaRemoveOne, SharedMediaResult,
    SharedMediaSliceUpdate, SharedMediaType, SharedMediaTypesMask,
};

use super::live_query::LiveQueries;

/// Per-list summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListStats {
    pub peer_id: PeerId,
    #[serde(rename = "type")]
    pub media_type: SharedMediaType,
    pub slices: usize,
    pub known_ids: usize,
    pub count: Option<usize>,
}

/// The lists of one conversation, one per media type.
struct PeerLists {
    lists: [SharedMediaList; SharedMediaType::COUNT],
    /// Republishes every list's slice updates with peer and type attached.
    _lifetime: Lifetime,
}

impl PeerLists {
    fn new(
        peer_id: PeerId,
        config: MediaConfig,
        slice_updated: &EventStream<SharedMediaSliceUpdate>,
    ) -> Self {
        let lists: [SharedMediaList; SharedMediaType::COUNT] =
            std::array::from_fn(|_| SharedMediaList::with_config(config));
        let mut lifetime = Lifetime::new();
        for media_type in SharedMediaType::ALL {
            let target = slice_updated.clone();
            lifetime.add(lists[media_type.index()].slice_updated().subscribe(
                move |update| {
                    target.fire(&SharedMediaSliceUpdate::new(peer_id, media_type, update));
                },
            ));
        }
        Self {
            lists,
            _lifetime: lifetime,
        }
    }

    fn list(&self, media_type: SharedMediaType) -> &SharedMediaList {
        &self.lists[media_type.index()]
    }

    fn list_mut(&mut self, media_type: SharedMediaType) -> &mut SharedMediaList {
        &mut self.lists[media_type.index()]
    }
}

/// Shared media index for every conversation in the session.
///
/// Mutations are routed to the lists named by the event, notifications are
/// republished with their conversation and type, and live queries on the
/// touched lists are recomputed before the mutation returns. All delivery is
/// synchronous. Mutation takes `&mut self`, so a callback cannot mutate the
/// index it is being notified by.
pub struct SharedMedia {
    lists: BTreeMap<PeerId, PeerLists>,
    config: MediaConfig,
    slice_updated: EventStream<SharedMediaSliceUpdate>,
    one_removed: EventStream<SharedMediaRemoveOne>,
    all_removed: EventStream<SharedMediaRemoveAll>,
    live_queries: LiveQueries,
}

impl SharedMedia {
    pub fn new() -> Self {
        Self::with_config(MediaConfig::default())
    }

    pub fn with_config(config: MediaConfig) -> Self {
        Self {
            lists: BTreeMap::new(),
            config,
            slice_updated: EventStream::new(),
            one_removed: EventStream::new(),
            all_removed: EventStream::new(),
            live_queries: LiveQueries::new(),
        }
    }

    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    /// A new message, newest of every type in `event.types`.
    pub fn add_new(&mut self, event: SharedMediaAddNew) {
        let lists = self.enforce_lists(event.peer_id);
        for media_type in event.types.iter() {
            lists.list_mut(media_type).add_new(event.message_id);
        }
        self.refresh_queries(event.peer_id, event.types);
    }

    /// A message found while loading history.
    pub fn add_existing(&mut self, event: SharedMediaAddExisting) {
        let lists = self.enforce_lists(event.peer_id);
        for media_type in event.types.iter() {
            lists
                .list_mut(media_type)
                .add_existing(event.message_id, event.no_skip_range);
        }
        self.refresh_queries(event.peer_id, event.types);
    }

    /// A page of history for one type.
    pub fn add_slice(&mut self, event: SharedMediaAddSlice) {
        let SharedMediaAddSlice {
            peer_id,
            media_type,
            message_ids,
            no_skip_range,
            count,
        } = event;
        self.enforce_lists(peer_id)
            .list_mut(media_type)
            .add_slice(message_ids, no_skip_range, count);
        self.refresh_queries(peer_id, media_type.into());
    }

    /// A message was deleted. Ignored for conversations never seen before.
    pub fn remove_one(&mut self, event: SharedMediaRemoveOne) {
        let Some(lists) = self.lists.get_mut(&event.peer_id) else {
            return;
        };
        for media_type in event.types.iter() {
            lists.list_mut(media_type).remove_one(event.message_id);
        }
        self.one_removed.fire(&event);
        self.refresh_queries(event.peer_id, event.types);
    }

    /// The conversation was cleared. Ignored for conversations never seen
    /// before.
    pub fn remove_all(&mut self, event: SharedMediaRemoveAll) {
        let Some(lists) = self.lists.get_mut(&event.peer_id) else {
            return;
        };
        for list in lists.lists.iter_mut() {
            list.remove_all();
        }
        self.all_removed.fire(&event);
        self.refresh_queries(event.peer_id, SharedMediaTypesMask::all());
    }

    /// Live query: `consumer` receives the current result now and a fresh
    /// one after every mutation that changes it, until the handle is dropped.
    pub fn query(
        &mut self,
        query: SharedMediaQuery,
        consumer: impl FnMut(&SharedMediaResult) + 'static,
    ) -> Subscription {
        self.enforce_lists(query.key.peer_id);
        let initial = self.query_snapshot(&query);
        self.live_queries.register(query, initial, consumer)
    }

    /// One-shot query. Unknown conversations answer with everything unknown.
    pub fn query_snapshot(&self, query: &SharedMediaQuery) -> SharedMediaResult {
        self.lists
            .get(&query.key.peer_id)
            .map(|lists| lists.list(query.key.media_type).query(query))
            .unwrap_or_default()
    }

    /// Slice-changed notifications of every list.
    pub fn slice_updated(&self) -> &EventStream<SharedMediaSliceUpdate> {
        &self.slice_updated
    }

    /// Item-removed notifications.
    pub fn one_removed(&self) -> &EventStream<SharedMediaRemoveOne> {
        &self.one_removed
    }

    /// All-removed notifications.
    pub fn all_removed(&self) -> &EventStream<SharedMediaRemoveAll> {
        &self.all_removed
    }

    pub fn list(&self, peer_id: PeerId, media_type: SharedMediaType) -> Option<&SharedMediaList> {
        self.lists.get(&peer_id).map(|lists| lists.list(media_type))
    }

    /// Conversations that have lists, ascending.
    pub fn peers(&self) -> impl Iterator<Item = PeerId> + '_ {
        self.lists.keys().copied()
    }

    /// Whether `message_id` is a known member of that list.
    pub fn contains(&self, peer_id: PeerId, media_type: SharedMediaType, message_id: MsgId) -> bool {
        self.list(peer_id, media_type)
            .is_some_and(|list| list.contains(message_id))
    }

    pub fn live_query_count(&self) -> usize {
        self.live_queries.len()
    }

    /// Summary of every list that holds any knowledge.
    pub fn stats(&self) -> Vec<ListStats> {
        self.lists
            .iter()
            .flat_map(|(&peer_id, lists)| {
                SharedMediaType::ALL.into_iter().filter_map(move |media_type| {
                    let list = lists.list(media_type);
                    (!list.is_empty()).then(|| ListStats {
                        peer_id,
                        media_type,
                        slices: list.slice_count(),
                        known_ids: list.known_ids(),
                        count: list.count(),
                    })
                })
            })
            .collect()
    }

    fn enforce_lists(&mut self, peer_id: PeerId) -> &mut PeerLists {
        let config = self.config;
        let slice_updated = &self.slice_updated;
        self.lists.entry(peer_id).or_insert_with(|| {
            log::debug!("allocating shared media lists for peer {}", peer_id);
            PeerLists::new(peer_id, config, slice_updated)
        })
    }

    fn refresh_queries(&self, peer_id: PeerId, types: SharedMediaTypesMask) {
        let Some(lists) = self.lists.get(&peer_id) else {
            return;
        };
        let compute = |query: &SharedMediaQuery| lists.list(query.key.media_type).query(query);
        if types == SharedMediaTypesMask::all() {
            self.live_queries.refresh(peer_id, None, compute);
        } else {
            for media_type in types.iter() {
                self.live_queries.refresh(peer_id, Some(media_type), compute);
            }
        }
    }
}

impl Default for SharedMedia {
    fn default() -> Self {
        Self::new()
    }
}
