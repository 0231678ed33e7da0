//! Ingestion events, queries, results and update notifications.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::media_type::{SharedMediaType, SharedMediaTypesMask};
use super::range::{MsgId, MsgRange, PeerId};

/// A message that is guaranteed to be the newest of its types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedMediaAddNew {
    pub peer_id: PeerId,
    pub types: SharedMediaTypesMask,
    pub message_id: MsgId,
}

impl SharedMediaAddNew {
    pub fn new(peer_id: PeerId, types: impl Into<SharedMediaTypesMask>, message_id: MsgId) -> Self {
        Self {
            peer_id,
            types: types.into(),
            message_id,
        }
    }
}

/// A message found while paging through history, with the range it was
/// loaded in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedMediaAddExisting {
    pub peer_id: PeerId,
    pub types: SharedMediaTypesMask,
    pub message_id: MsgId,
    pub no_skip_range: MsgRange,
}

impl SharedMediaAddExisting {
    pub fn new(
        peer_id: PeerId,
        types: impl Into<SharedMediaTypesMask>,
        message_id: MsgId,
        no_skip_range: MsgRange,
    ) -> Self {
        Self {
            peer_id,
            types: types.into(),
            message_id,
            no_skip_range,
        }
    }
}

/// A page of message ids of one type, complete over `no_skip_range`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedMediaAddSlice {
    pub peer_id: PeerId,
    #[serde(rename = "type")]
    pub media_type: SharedMediaType,
    pub message_ids: Vec<MsgId>,
    pub no_skip_range: MsgRange,
    /// Authoritative total count, when the source knows it.
    #[serde(default)]
    pub count: Option<usize>,
}

impl SharedMediaAddSlice {
    pub fn new(
        peer_id: PeerId,
        media_type: SharedMediaType,
        message_ids: Vec<MsgId>,
        no_skip_range: MsgRange,
        count: Option<usize>,
    ) -> Self {
        Self {
            peer_id,
            media_type,
            message_ids,
            no_skip_range,
            count,
        }
    }
}

/// A message deleted from the conversation. Also published as the
/// item-removed notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedMediaRemoveOne {
    pub peer_id: PeerId,
    pub types: SharedMediaTypesMask,
    pub message_id: MsgId,
}

impl SharedMediaRemoveOne {
    pub fn new(peer_id: PeerId, types: impl Into<SharedMediaTypesMask>, message_id: MsgId) -> Self {
        Self {
            peer_id,
            types: types.into(),
            message_id,
        }
    }
}

/// The whole conversation was cleared. Also published as the all-removed
/// notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedMediaRemoveAll {
    pub peer_id: PeerId,
}

impl SharedMediaRemoveAll {
    pub fn new(peer_id: PeerId) -> Self {
        Self { peer_id }
    }
}

/// Identifies the list a query reads and the message it is centered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SharedMediaKey {
    pub peer_id: PeerId,
    #[serde(rename = "type")]
    pub media_type: SharedMediaType,
    pub message_id: MsgId,
}

impl SharedMediaKey {
    pub fn new(peer_id: PeerId, media_type: SharedMediaType, message_id: MsgId) -> Self {
        Self {
            peer_id,
            media_type,
            message_id,
        }
    }
}

/// A window request around `key.message_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedMediaQuery {
    pub key: SharedMediaKey,
    pub limit_before: usize,
    pub limit_after: usize,
}

impl SharedMediaQuery {
    pub fn new(key: SharedMediaKey, limit_before: usize, limit_after: usize) -> Self {
        Self {
            key,
            limit_before,
            limit_after,
        }
    }
}

/// Answer to a [`SharedMediaQuery`]. `None` means "unknown": the caller has
/// to fetch from the authoritative source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedMediaResult {
    pub count: Option<usize>,
    pub skipped_before: Option<usize>,
    pub skipped_after: Option<usize>,
    /// Ascending, unique.
    pub message_ids: Vec<MsgId>,
}

/// A slice of one list was created or coalesced.
///
/// `messages` shares storage with the index; holding on to it past the
/// notification makes the next mutation of that slice copy its ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceUpdate {
    pub messages: Rc<Vec<MsgId>>,
    pub range: MsgRange,
    pub count: Option<usize>,
}

/// A [`SliceUpdate`] republished with the list it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedMediaSliceUpdate {
    pub peer_id: PeerId,
    pub media_type: SharedMediaType,
    pub messages: Rc<Vec<MsgId>>,
    pub range: MsgRange,
    pub count: Option<usize>,
}

impl SharedMediaSliceUpdate {
    pub fn new(peer_id: PeerId, media_type: SharedMediaType, update: &SliceUpdate) -> Self {
        Self {
            peer_id,
            media_type,
            messages: Rc::clone(&update.messages),
            range: update.range,
            count: update.count,
        }
    }
}
