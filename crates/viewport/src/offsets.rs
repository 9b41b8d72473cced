use std::collections::HashMap;

use sessionlens_core::{Message, MessageId};

/// Ordered message sequence with a sparse height cache and the cumulative
/// offset table derived from both.
///
/// The table is a pure function of (sequence, cache, estimate, gap) and is
/// always rebuilt in full by [`OffsetModel::recompute`]. Sequence changes
/// recompute immediately; height measurements do not, the caller schedules
/// the recompute.
#[derive(Debug, Clone)]
pub struct OffsetModel {
    messages: Vec<Message>,
    heights: HashMap<MessageId, u32>,
    offsets: Vec<u32>,
    total_height: u32,
    estimate: u32,
    gap: u32,
}

impl OffsetModel {
    pub fn new(estimate: u32, gap: u32) -> Self {
        Self {
            messages: Vec::new(),
            heights: HashMap::new(),
            offsets: Vec::new(),
            total_height: 0,
            estimate,
            gap,
        }
    }

    /// Install a new sequence. Cached heights belong to the previous one and are dropped.
    pub fn set_sequence(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.heights.clear();
        self.recompute();
    }

    /// Swap in a newer snapshot of the same session. Ids are stable across
    /// snapshots, so heights of surviving messages stay valid.
    pub fn replace_sequence(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        let live: std::collections::HashSet<&MessageId> =
            self.messages.iter().map(|m| &m.id).collect();
        self.heights.retain(|id, _| live.contains(id));
        self.recompute();
    }

    /// Reverse the sequence order. Heights are invalidated along with it.
    pub fn reverse(&mut self) {
        self.messages.reverse();
        self.heights.clear();
        self.recompute();
    }

    /// Drop every cached height, e.g. after a layout-affecting mode change.
    pub fn invalidate_heights(&mut self) {
        self.heights.clear();
        self.recompute();
    }

    /// Store a measured height. Returns `true` when it differs from what
    /// the cache held (an unmeasured id always counts as a change).
    pub fn record_height(&mut self, id: &MessageId, height: u32) -> bool {
        match self.heights.get(id) {
            Some(&cached) if cached == height => false,
            _ => {
                self.heights.insert(id.clone(), height);
                true
            }
        }
    }

    /// Rebuild the offset table and return the total content height.
    pub fn recompute(&mut self) -> u32 {
        self.offsets.clear();
        self.offsets.reserve(self.messages.len());
        let mut cursor: u32 = 0;
        for message in &self.messages {
            self.offsets.push(cursor);
            let height = self.cached_or_estimate(&message.id);
            cursor = cursor.saturating_add(height).saturating_add(self.gap);
        }
        self.total_height = if self.messages.is_empty() {
            0
        } else {
            cursor.saturating_sub(self.gap)
        };
        self.total_height
    }

    fn cached_or_estimate(&self, id: &MessageId) -> u32 {
        self.heights.get(id).copied().unwrap_or(self.estimate)
    }

    /// Height of message `index`: cached if measured, the estimate otherwise.
    pub fn height(&self, index: usize) -> u32 {
        self.messages
            .get(index)
            .map_or(0, |m| self.cached_or_estimate(&m.id))
    }

    pub fn offset(&self, index: usize) -> u32 {
        debug_assert!(!self.is_stale(), "offset table read before recompute");
        self.offsets.get(index).copied().unwrap_or(self.total_height)
    }

    /// Bottom edge of message `index` (no trailing gap).
    pub fn bottom(&self, index: usize) -> u32 {
        self.offset(index).saturating_add(self.height(index))
    }

    pub fn offsets(&self) -> &[u32] {
        debug_assert!(!self.is_stale(), "offset table read before recompute");
        &self.offsets
    }

    pub fn total_height(&self) -> u32 {
        self.total_height
    }

    pub fn gap(&self) -> u32 {
        self.gap
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn index_of(&self, id: &MessageId) -> Option<usize> {
        self.messages.iter().position(|m| &m.id == id)
    }

    pub fn is_measured(&self, id: &MessageId) -> bool {
        self.heights.contains_key(id)
    }

    pub fn measured_count(&self) -> usize {
        self.heights.len()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The table no longer lines up with the sequence.
    pub fn is_stale(&self) -> bool {
        self.offsets.len() != self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sessionlens_core::testing;

    fn model(count: usize) -> OffsetModel {
        let mut model = OffsetModel::new(80, 16);
        model.set_sequence(testing::messages(count));
        model
    }

    #[test]
    fn estimates_fill_unmeasured_items() {
        let model = model(3);
        assert_eq!(model.offsets(), &[0, 96, 192]);
        assert_eq!(model.total_height(), 272);
    }

    #[test]
    fn measured_height_shifts_following_offsets() {
        let mut model = model(3);
        assert!(model.record_height(&MessageId::from("m0"), 40));
        assert_eq!(model.recompute(), 232);
        assert_eq!(model.offsets(), &[0, 56, 152]);
    }

    #[test]
    fn offsets_follow_height_plus_gap_invariant() {
        let mut model = model(20);
        for (i, h) in [(1, 3), (4, 120), (7, 0), (19, 55)] {
            model.record_height(&MessageId::new(format!("m{i}")), h);
        }
        let total = model.recompute();

        assert_eq!(model.offset(0), 0);
        for i in 0..model.len() - 1 {
            assert_eq!(model.offset(i + 1) - model.offset(i), model.height(i) + 16);
        }
        let last = model.len() - 1;
        assert_eq!(total, model.offset(last) + model.height(last));
    }

    #[test]
    fn empty_sequence_has_zero_height() {
        let mut model = model(0);
        assert_eq!(model.recompute(), 0);
        assert!(model.offsets().is_empty());
    }

    #[test]
    fn identical_measurement_is_not_a_change() {
        let mut model = model(2);
        let id = MessageId::from("m1");
        assert!(model.record_height(&id, 12));
        assert!(!model.record_height(&id, 12));
        assert!(model.record_height(&id, 13));
    }

    #[test]
    fn new_sequence_and_reverse_clear_the_cache() {
        let mut model = model(3);
        model.record_height(&MessageId::from("m2"), 10);
        model.reverse();
        assert_eq!(model.measured_count(), 0);
        assert_eq!(model.message(0).map(|m| m.id.as_str()), Some("m2"));
        assert_eq!(model.offsets(), &[0, 96, 192]);

        model.record_height(&MessageId::from("m2"), 10);
        model.set_sequence(testing::messages(1));
        assert_eq!(model.measured_count(), 0);
    }

    #[test]
    fn replacing_with_a_newer_snapshot_keeps_surviving_heights() {
        let mut model = model(2);
        model.record_height(&MessageId::from("m0"), 10);
        model.record_height(&MessageId::from("gone"), 10);
        model.replace_sequence(testing::messages(4));

        assert!(model.is_measured(&MessageId::from("m0")));
        assert!(!model.is_measured(&MessageId::from("gone")));
        assert_eq!(model.offsets(), &[0, 26, 122, 218]);
    }
}
