//! Message identifiers and closed no-skip ranges over them.

use serde::{Deserialize, Serialize};

use crate::types::error::{MediaError, MediaResult};

/// Message identifier, totally ordered within one conversation.
pub type MsgId = i64;

/// Conversation identifier.
pub type PeerId = u64;

/// Lower range bound meaning "reaches the true start of history".
pub const HISTORY_START: MsgId = 0;

/// Upper range bound meaning "reaches the newest message".
pub const HISTORY_END: MsgId = 0x3FFF_FFFF;

/// Whether `id` lies between the two sentinels, inclusive.
pub fn in_history(id: MsgId) -> bool {
    (HISTORY_START..=HISTORY_END).contains(&id)
}

/// Closed interval `[from, till]` of message ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MsgRange {
    pub from: MsgId,
    pub till: MsgId,
}

impl MsgRange {
    /// Create a range. Panics if `from > till`.
    pub fn new(from: MsgId, till: MsgId) -> Self {
        assert!(from <= till, "message range from {from} > till {till}");
        Self { from, till }
    }

    /// Create a range from untrusted input. Both bounds must lie within
    /// `[HISTORY_START, HISTORY_END]`.
    pub fn try_new(from: MsgId, till: MsgId) -> MediaResult<Self> {
        if from > till || !in_history(from) || !in_history(till) {
            return Err(MediaError::InvalidRange { from, till });
        }
        Ok(Self { from, till })
    }

    /// The whole history, start sentinel to end sentinel.
    pub fn full() -> Self {
        Self {
            from: HISTORY_START,
            till: HISTORY_END,
        }
    }

    /// A range covering a single id.
    pub fn point(id: MsgId) -> Self {
        Self { from: id, till: id }
    }

    /// From `id` up to the newest message.
    pub fn up_to_end(id: MsgId) -> Self {
        Self::new(id, id.max(HISTORY_END))
    }

    pub fn contains(&self, id: MsgId) -> bool {
        self.from <= id && id <= self.till
    }

    /// Whether the two closed ranges share at least one point.
    pub fn touches(&self, other: &MsgRange) -> bool {
        self.from <= other.till && other.from <= self.till
    }

    /// Smallest range covering both.
    pub fn union(&self, other: &MsgRange) -> MsgRange {
        MsgRange {
            from: self.from.min(other.from),
            till: self.till.max(other.till),
        }
    }

    /// Bounds past a sentinel count as reaching it.
    pub fn reaches_start(&self) -> bool {
        self.from <= HISTORY_START
    }

    pub fn reaches_end(&self) -> bool {
        self.till >= HISTORY_END
    }

    pub fn is_full(&self) -> bool {
        self.reaches_start() && self.reaches_end()
    }
}

impl Default for MsgRange {
    fn default() -> Self {
        Self::full()
    }
}

impl std::fmt::Display for MsgRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let from = if self.reaches_start() {
            "start".to_string()
        } else {
            self.from.to_string()
        };
        let till = if self.reaches_end() {
            "end".to_string()
        } else {
            self.till.to_string()
        };
        write!(f, "[{}, {}]", from, till)
    }
}
