//! Per-conversation, per-type partial index of shared media.
//!
//! A list holds sorted, pairwise disjoint and non-touching [`Slice`]s plus an
//! optional total count. Adding a range coalesces every slice it overlaps or
//! touches into one; queries answer a window around an anchor message with
//! exact skip counts only where a slice is proven to reach an edge of history.

use crate::config::{MediaConfig, UnknownTotalPolicy};
use crate::stream::EventStream;
use crate::types::{MsgId, MsgRange, SharedMediaQuery, SharedMediaResult, SliceUpdate};

use super::slice::Slice;

/// Partial index for one (conversation, media type) pair.
pub struct SharedMediaList {
    /// Sorted by `range.from`; no two ranges overlap or touch.
    slices: Vec<Slice>,
    /// True total of this type in the conversation, when known.
    count: Option<usize>,
    config: MediaConfig,
    slice_updated: EventStream<SliceUpdate>,
}

impl SharedMediaList {
    /// Create an empty list with the default configuration.
    pub fn new() -> Self {
        Self::with_config(MediaConfig::default())
    }

    pub fn with_config(config: MediaConfig) -> Self {
        Self {
            slices: Vec::new(),
            count: None,
            config,
            slice_updated: EventStream::new(),
        }
    }

    /// Record `message_id` as the newest message of this type.
    pub fn add_new(&mut self, message_id: MsgId) {
        self.add_range([message_id], MsgRange::up_to_end(message_id), None, true);
    }

    /// Record a message found while paging through history. Its existence
    /// was already part of an earlier authoritative total.
    pub fn add_existing(&mut self, message_id: MsgId, no_skip_range: MsgRange) {
        self.add_range([message_id], no_skip_range, None, false);
    }

    /// Record a page of ids complete over `no_skip_range`. A supplied `count`
    /// replaces the total.
    pub fn add_slice(
        &mut self,
        message_ids: impl IntoIterator<Item = MsgId>,
        no_skip_range: MsgRange,
        count: Option<usize>,
    ) {
        self.add_range(message_ids, no_skip_range, count, false);
    }

    /// Forget `message_id`. Returns whether a slice contained it. A known
    /// total is decremented either way.
    pub fn remove_one(&mut self, message_id: MsgId) -> bool {
        let removed = match self.slice_position(message_id) {
            Some(index) => self.slices[index].remove(message_id),
            None => false,
        };
        if let Some(count) = self.count.as_mut() {
            if *count > 0 {
                *count -= 1;
            } else {
                log::warn!(
                    "removing message {} from a list with total 0, keeping 0",
                    message_id
                );
            }
        }
        removed
    }

    /// Nothing of this type remains.
    pub fn remove_all(&mut self) {
        self.slices.clear();
        self.count = Some(0);
    }

    /// Answer a window around `query.key.message_id`.
    pub fn query(&self, query: &SharedMediaQuery) -> SharedMediaResult {
        match self.find_slice(query.key.message_id) {
            Some(slice) => self.query_from_slice(query, slice),
            None => SharedMediaResult {
                count: self.count,
                ..SharedMediaResult::default()
            },
        }
    }

    /// Slice-changed notifications, fired at the end of every add.
    pub fn slice_updated(&self) -> &EventStream<SliceUpdate> {
        &self.slice_updated
    }

    pub fn count(&self) -> Option<usize> {
        self.count
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn slice_count(&self) -> usize {
        self.slices.len()
    }

    /// Number of ids held across all slices.
    pub fn known_ids(&self) -> usize {
        self.slices.iter().map(Slice::len).sum()
    }

    /// Slice whose range covers `message_id`.
    pub fn find_slice(&self, message_id: MsgId) -> Option<&Slice> {
        self.slice_position(message_id).map(|i| &self.slices[i])
    }

    pub fn contains(&self, message_id: MsgId) -> bool {
        self.find_slice(message_id)
            .is_some_and(|slice| slice.contains(message_id))
    }

    /// No slices and no known total.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty() && self.count.is_none()
    }

    fn slice_position(&self, message_id: MsgId) -> Option<usize> {
        let index = self
            .slices
            .partition_point(|slice| slice.range().till < message_id);
        self.slices
            .get(index)
            .filter(|slice| slice.range().from <= message_id)
            .map(|_| index)
    }

    /// Indices of the slices whose ranges overlap or touch `range`.
    fn touching_band(&self, range: MsgRange) -> std::ops::Range<usize> {
        let start = self
            .slices
            .partition_point(|slice| slice.range().till < range.from);
        let end = self
            .slices
            .partition_point(|slice| slice.range().from <= range.till);
        start..end
    }

    fn add_range<I>(
        &mut self,
        message_ids: I,
        no_skip_range: MsgRange,
        count: Option<usize>,
        increment_count: bool,
    ) where
        I: IntoIterator<Item = MsgId>,
    {
        let mut ids: Vec<MsgId> = message_ids
            .into_iter()
            .filter(|id| {
                let inside = no_skip_range.contains(*id);
                if !inside {
                    log::warn!("dropping message {} outside range {}", id, no_skip_range);
                }
                inside
            })
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let discovered = ids.iter().filter(|id| !self.contains(**id)).count();
        let index = self.add_range_items(ids, no_skip_range);

        if let Some(count) = count {
            self.count = Some(count);
        } else if increment_count && discovered > 0 {
            self.count = match (self.count, self.config.increment_unknown_total) {
                (Some(known), _) => Some(known + discovered),
                (None, UnknownTotalPolicy::StartAtIncrement) => Some(discovered),
                (None, UnknownTotalPolicy::StayUnknown) => None,
            };
        }
        if self.config.infer_total_from_full_slice {
            if let [only] = self.slices.as_slice() {
                if only.range().is_full() {
                    self.count = Some(only.len());
                }
            }
        }

        let slice = &self.slices[index];
        let update = SliceUpdate {
            messages: slice.shared_messages(),
            range: slice.range(),
            count: self.count,
        };
        self.slice_updated.fire(&update);
    }

    fn query_from_slice(&self, query: &SharedMediaQuery, slice: &Slice) -> SharedMediaResult {
        let anchor = query.key.message_id;
        let messages = slice.messages();
        let position = slice.lower_bound(anchor);
        let anchor_present = messages.get(position) == Some(&anchor);

        let have_before = position;
        let have_from_anchor = messages.len() - position;
        let before = have_before.min(query.limit_before);
        let wanted_from_anchor = if anchor_present {
            query.limit_after.saturating_add(1)
        } else {
            query.limit_after
        };
        let from_anchor = have_from_anchor.min(wanted_from_anchor);

        let message_ids = messages[position - before..position + from_anchor].to_vec();
        let mut skipped_before = slice
            .range()
            .reaches_start()
            .then_some(have_before - before);
        let mut skipped_after = slice
            .range()
            .reaches_end()
            .then_some(have_from_anchor - from_anchor);

        if self.config.derive_skipped_from_total {
            if let Some(count) = self.count {
                let shown = message_ids.len();
                match (skipped_before, skipped_after) {
                    (None, Some(after)) => {
                        skipped_before = Some(count.saturating_sub(after + shown));
                    }
                    (Some(before), None) => {
                        skipped_after = Some(count.saturating_sub(before + shown));
                    }
                    _ => {}
                }
            }
        }

        SharedMediaResult {
            count: self.count,
            skipped_before,
            skipped_after,
            message_ids,
        }
    }

    /// Insert or coalesce; returns the index of the resulting slice.
    fn add_range_items(&mut self, ids: Vec<MsgId>, no_skip_range: MsgRange) -> usize {
        let band = self.touching_band(no_skip_range);
        if band.is_empty() {
            log::debug!(
                "new slice {} with {} ids at position {}",
                no_skip_range,
                ids.len(),
                band.start
            );
            self.slices
                .insert(band.start, Slice::new(ids, no_skip_range));
            return band.start;
        }
        self.unite_and_add(band, ids, no_skip_range)
    }

    fn unite_and_add(
        &mut self,
        band: std::ops::Range<usize>,
        ids: Vec<MsgId>,
        no_skip_range: MsgRange,
    ) -> usize {
        let first = band.start;
        let folded: Vec<Slice> = self.slices.drain(first + 1..band.end).collect();
        if !folded.is_empty() {
            log::debug!(
                "coalescing {} slices around {}",
                folded.len() + 1,
                no_skip_range
            );
        }
        let target = &mut self.slices[first];
        target.merge(ids, no_skip_range);
        for slice in folded {
            target.absorb(slice);
        }
        first
    }
}

impl Default for SharedMediaList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SharedMediaList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedMediaList")
            .field("count", &self.count)
            .field("slices", &self.slices)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SharedMediaKey, SharedMediaType, HISTORY_END, HISTORY_START};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn window(anchor: MsgId, before: usize, after: usize) -> SharedMediaQuery {
        SharedMediaQuery::new(
            SharedMediaKey::new(1, SharedMediaType::Photo, anchor),
            before,
            after,
        )
    }

    fn ranges(list: &SharedMediaList) -> Vec<MsgRange> {
        list.slices().iter().map(Slice::range).collect()
    }

    #[test]
    fn band_insert_keeps_order() {
        let mut list = SharedMediaList::new();
        list.add_slice([50], MsgRange::new(45, 55), None);
        list.add_slice([10], MsgRange::new(5, 15), None);
        list.add_slice([30], MsgRange::new(25, 35), None);
        assert_eq!(
            ranges(&list),
            vec![
                MsgRange::new(5, 15),
                MsgRange::new(25, 35),
                MsgRange::new(45, 55)
            ]
        );
    }

    #[test]
    fn bridging_range_coalesces_band() {
        let mut list = SharedMediaList::new();
        list.add_slice([10], MsgRange::new(5, 15), None);
        list.add_slice([30], MsgRange::new(25, 35), None);
        list.add_slice([50], MsgRange::new(45, 55), None);
        list.add_slice([70], MsgRange::new(65, 75), None);
        list.add_slice([20, 40], MsgRange::new(15, 45), None);
        assert_eq!(
            ranges(&list),
            vec![MsgRange::new(5, 55), MsgRange::new(65, 75)]
        );
        assert_eq!(list.slices()[0].messages(), &[10, 20, 30, 40, 50]);
    }

    #[test]
    fn ids_outside_range_are_dropped() {
        let mut list = SharedMediaList::new();
        list.add_slice([1, 5, 99], MsgRange::new(2, 10), None);
        assert_eq!(list.slices()[0].messages(), &[5]);
    }

    #[test]
    fn add_new_increments_only_discovered_ids() {
        let mut list = SharedMediaList::new();
        list.add_slice([10, 20], MsgRange::new(HISTORY_START, 20), Some(2));
        list.add_new(30);
        assert_eq!(list.count(), Some(3));
        list.add_new(30);
        assert_eq!(list.count(), Some(3));
    }

    #[test]
    fn add_new_on_unknown_total_follows_policy() {
        let mut list = SharedMediaList::new();
        list.add_new(5);
        assert_eq!(list.count(), None);

        let mut list = SharedMediaList::with_config(MediaConfig {
            increment_unknown_total: UnknownTotalPolicy::StartAtIncrement,
            ..MediaConfig::default()
        });
        list.add_new(5);
        assert_eq!(list.count(), Some(1));
    }

    #[test]
    fn add_existing_never_increments() {
        let mut list = SharedMediaList::new();
        list.add_slice([10], MsgRange::new(HISTORY_START, 10), Some(1));
        list.add_existing(15, MsgRange::new(10, 20));
        assert_eq!(list.count(), Some(1));
        assert_eq!(list.slices()[0].messages(), &[10, 15]);
    }

    #[test]
    fn range_past_start_sentinel_counts_skips_exactly() {
        let mut list = SharedMediaList::new();
        list.add_slice([-3, 5], MsgRange::new(-10, 10), None);
        let result = list.query(&window(5, 5, 5));
        assert_eq!(result.message_ids, vec![-3, 5]);
        assert_eq!(result.skipped_before, Some(0));
        assert_eq!(result.skipped_after, None);
    }

    #[test]
    fn add_new_past_end_sentinel_reaches_end() {
        let mut list = SharedMediaList::new();
        list.add_new(HISTORY_END + 7);
        let slice = &list.slices()[0];
        assert!(slice.range().reaches_end());
        let result = list.query(&window(HISTORY_END + 7, 1, 1));
        assert_eq!(result.message_ids, vec![HISTORY_END + 7]);
        assert_eq!(result.skipped_after, Some(0));
    }

    #[test]
    fn remove_one_outside_slices_still_decrements() {
        let mut list = SharedMediaList::new();
        list.add_slice([10], MsgRange::new(5, 15), Some(7));
        assert!(!list.remove_one(100));
        assert_eq!(list.count(), Some(6));
        assert!(list.remove_one(10));
        assert_eq!(list.count(), Some(5));
        assert!(list.slices()[0].is_empty());
    }

    #[test]
    fn remove_one_on_zero_total_stays_zero() {
        let mut list = SharedMediaList::new();
        list.remove_all();
        list.remove_one(3);
        assert_eq!(list.count(), Some(0));
    }

    #[test]
    fn query_absent_anchor_takes_following_ids() {
        let mut list = SharedMediaList::new();
        list.add_slice([10, 20, 30, 40], MsgRange::full(), Some(4));
        let result = list.query(&window(25, 1, 1));
        assert_eq!(result.message_ids, vec![20, 30]);
        assert_eq!(result.skipped_before, Some(1));
        assert_eq!(result.skipped_after, Some(1));
    }

    #[test]
    fn query_clips_to_slice_bounds() {
        let mut list = SharedMediaList::new();
        list.add_slice([10, 20, 30], MsgRange::new(5, HISTORY_END), None);
        let result = list.query(&window(10, 5, 5));
        assert_eq!(result.message_ids, vec![10, 20, 30]);
        assert_eq!(result.skipped_before, None);
        assert_eq!(result.skipped_after, Some(0));
        assert_eq!(result.count, None);
    }

    #[test]
    fn query_with_huge_after_limit_does_not_overflow() {
        let mut list = SharedMediaList::new();
        list.add_slice([1, 2], MsgRange::full(), None);
        let result = list.query(&window(1, 0, usize::MAX));
        assert_eq!(result.message_ids, vec![1, 2]);
    }

    #[test]
    fn derived_skips_fill_unknown_side() {
        let mut list = SharedMediaList::with_config(MediaConfig {
            derive_skipped_from_total: true,
            ..MediaConfig::default()
        });
        list.add_slice([10, 20, 30], MsgRange::new(HISTORY_START, 30), Some(5));
        let result = list.query(&window(20, 1, 1));
        assert_eq!(result.skipped_before, Some(0));
        assert_eq!(result.skipped_after, Some(2));
    }

    #[test]
    fn full_slice_can_define_total() {
        let mut list = SharedMediaList::with_config(MediaConfig {
            infer_total_from_full_slice: true,
            ..MediaConfig::default()
        });
        list.add_slice([1, 2, 3], MsgRange::new(HISTORY_START, 3), None);
        assert_eq!(list.count(), None);
        list.add_slice([4], MsgRange::new(3, HISTORY_END), None);
        assert_eq!(list.count(), Some(4));
    }

    #[test]
    fn slice_updated_carries_coalesced_slice() {
        let mut list = SharedMediaList::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = Rc::clone(&seen);
            list.slice_updated().subscribe(move |update: &SliceUpdate| {
                seen.borrow_mut()
                    .push(((*update.messages).clone(), update.range, update.count));
            })
        };
        list.add_slice([10], MsgRange::new(5, 10), Some(3));
        list.add_existing(12, MsgRange::new(10, 12));
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], (vec![10, 12], MsgRange::new(5, 12), Some(3)));
    }
}
