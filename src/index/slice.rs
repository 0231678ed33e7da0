//! A set of known message ids paired with the range it is complete over.

use std::rc::Rc;

use crate::types::{MsgId, MsgRange};

/// Known ids of one media type plus the no-skip range they were loaded
/// over: an id inside `range` that is missing from `messages` does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    /// Ascending, unique. Shared with notifications, copied on write.
    messages: Rc<Vec<MsgId>>,
    range: MsgRange,
}

impl Slice {
    /// Create a slice from ids in any order; duplicates collapse.
    pub fn new(messages: impl IntoIterator<Item = MsgId>, range: MsgRange) -> Self {
        let mut messages: Vec<MsgId> = messages.into_iter().collect();
        messages.sort_unstable();
        messages.dedup();
        Self {
            messages: Rc::new(messages),
            range,
        }
    }

    /// Union `more` into this slice and widen the range to cover
    /// `more_range`. The ranges must overlap or touch.
    pub fn merge<I>(&mut self, more: I, more_range: MsgRange)
    where
        I: IntoIterator<Item = MsgId>,
    {
        assert!(
            self.range.touches(&more_range),
            "merging slice {} with disjoint range {}",
            self.range,
            more_range
        );
        let mut more = more.into_iter().peekable();
        if more.peek().is_some() {
            let messages = Rc::make_mut(&mut self.messages);
            let had = messages.len();
            let last = messages.last().copied();
            messages.extend(more);
            let appended_in_order = messages[had..].windows(2).all(|w| w[0] < w[1])
                && match (last, messages.get(had)) {
                    (Some(last), Some(first_new)) => last < *first_new,
                    _ => true,
                };
            if !appended_in_order {
                messages.sort_unstable();
                messages.dedup();
            }
        }
        self.range = self.range.union(&more_range);
    }

    /// Fold another slice into this one.
    pub fn absorb(&mut self, other: Slice) {
        let Slice { messages, range } = other;
        self.merge(messages.iter().copied(), range);
    }

    /// Remove `id`, returning whether it was present.
    pub fn remove(&mut self, id: MsgId) -> bool {
        match self.messages.binary_search(&id) {
            Ok(pos) => {
                Rc::make_mut(&mut self.messages).remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub fn messages(&self) -> &[MsgId] {
        &self.messages
    }

    /// Handle on the id storage for notifications.
    pub fn shared_messages(&self) -> Rc<Vec<MsgId>> {
        Rc::clone(&self.messages)
    }

    pub fn range(&self) -> MsgRange {
        self.range
    }

    pub fn contains(&self, id: MsgId) -> bool {
        self.messages.binary_search(&id).is_ok()
    }

    /// Index of the first id not less than `id`.
    pub fn lower_bound(&self, id: MsgId) -> usize {
        self.messages.partition_point(|m| *m < id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HISTORY_END, HISTORY_START};

    #[test]
    fn new_sorts_and_dedups() {
        let slice = Slice::new([30, 10, 20, 10], MsgRange::new(5, 30));
        assert_eq!(slice.messages(), &[10, 20, 30]);
        assert_eq!(slice.len(), 3);
    }

    #[test]
    fn merge_unions_ids_and_ranges() {
        let mut slice = Slice::new([10, 20], MsgRange::new(HISTORY_START, 20));
        slice.merge([20, 25, 15], MsgRange::new(20, 30));
        assert_eq!(slice.messages(), &[10, 15, 20, 25]);
        assert_eq!(slice.range(), MsgRange::new(HISTORY_START, 30));
    }

    #[test]
    fn merge_appends_in_order_without_resort() {
        let mut slice = Slice::new([1, 2], MsgRange::new(1, 2));
        slice.merge([3, 4], MsgRange::new(2, HISTORY_END));
        assert_eq!(slice.messages(), &[1, 2, 3, 4]);
        assert!(slice.range().reaches_end());
    }

    #[test]
    fn merge_with_empty_ids_only_widens() {
        let mut slice = Slice::new([10], MsgRange::new(10, 10));
        slice.merge(std::iter::empty(), MsgRange::new(5, 12));
        assert_eq!(slice.messages(), &[10]);
        assert_eq!(slice.range(), MsgRange::new(5, 12));
    }

    #[test]
    #[should_panic(expected = "disjoint")]
    fn merge_disjoint_is_fatal() {
        let mut slice = Slice::new([1], MsgRange::new(1, 5));
        slice.merge([10], MsgRange::new(6, 10));
    }

    #[test]
    fn shared_storage_is_copied_on_write() {
        let mut slice = Slice::new([1, 2, 3], MsgRange::new(1, 3));
        let held = slice.shared_messages();
        assert!(slice.remove(2));
        assert_eq!(*held, vec![1, 2, 3]);
        assert_eq!(slice.messages(), &[1, 3]);
        assert!(!slice.remove(2));
    }

    #[test]
    fn lower_bound_positions() {
        let slice = Slice::new([10, 20, 30], MsgRange::new(0, 30));
        assert_eq!(slice.lower_bound(5), 0);
        assert_eq!(slice.lower_bound(20), 1);
        assert_eq!(slice.lower_bound(25), 2);
        assert_eq!(slice.lower_bound(31), 3);
    }
}
