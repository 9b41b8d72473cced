use std::ops::Range;

use crate::offsets::OffsetModel;

/// Half-open index range `[start, end)` of materialized messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleWindow {
    pub start: usize,
    pub end: usize,
}

impl VisibleWindow {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Clamp to a sequence of `len` messages.
    pub fn clamped(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }
}

/// Resolve the messages to materialize for a scroll position.
///
/// The target band is `[scroll_top - buffer, scroll_top + viewport_height + buffer]`.
/// `start` is one before the first message whose bottom reaches the band;
/// `end` is two past the last message whose top lies inside it, so estimate
/// error never leaves a visible gap at either edge.
pub fn resolve(
    model: &OffsetModel,
    scroll_top: u32,
    viewport_height: u32,
    buffer: u32,
) -> VisibleWindow {
    let len = model.len();
    if len == 0 {
        return VisibleWindow::default();
    }
    let band_start = scroll_top.saturating_sub(buffer);
    let band_end = scroll_top
        .saturating_add(viewport_height)
        .saturating_add(buffer);

    // Bottoms are monotonic because heights and the gap are non-negative.
    let (mut lo, mut hi) = (0, len);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if model.bottom(mid) < band_start {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    let start = lo.saturating_sub(1).min(len - 1);

    let tops_in_band = model.offsets().partition_point(|&top| top <= band_end);
    let end = (tops_in_band.max(1) + 1).min(len);

    VisibleWindow::new(start, end)
}
