use std::ops::Range;

use sessionlens_core::Message;

use crate::offsets::OffsetModel;
use crate::window::VisibleWindow;

/// What a surface must draw: the window plus the spacer rows that stand in
/// for everything outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderPlan {
    pub window: VisibleWindow,
    /// Rows above `window.start` (its offset).
    pub leading_spacer: u32,
    /// Rows below the last windowed message, down to the total height.
    pub trailing_spacer: u32,
    pub total_height: u32,
    /// Scroll position the plan is drawn at.
    pub scroll_top: u32,
    /// Blank rows between consecutive messages.
    pub gap: u32,
}

impl RenderPlan {
    pub fn new(model: &OffsetModel, window: VisibleWindow, scroll_top: u32) -> Self {
        let window = window.clamped(model.len());
        let total_height = model.total_height();
        if window.is_empty() {
            return Self {
                window,
                leading_spacer: 0,
                trailing_spacer: total_height,
                total_height,
                scroll_top,
                gap: model.gap(),
            };
        }
        let leading_spacer = if window.start == 0 {
            0
        } else {
            model.offset(window.start)
        };
        let last = window.end - 1;
        let consumed = model
            .offset(last)
            .saturating_add(model.height(last))
            .saturating_add(model.gap());
        Self {
            window,
            leading_spacer,
            trailing_spacer: total_height.saturating_sub(consumed),
            total_height,
            scroll_top,
            gap: model.gap(),
        }
    }

    pub fn indices(&self) -> Range<usize> {
        self.window.range()
    }
}

/// The measurement callback: draws a plan and reports real heights.
///
/// Implementations lay the windowed messages out after the leading spacer and
/// return one measured height per message in `plan.indices()` order.
pub trait RenderSurface {
    fn materialize(&mut self, plan: &RenderPlan, messages: &[Message]) -> Vec<u32>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOutcome {
    pub plan: RenderPlan,
    /// Messages whose measured height differed from the cache.
    pub changed: usize,
    /// Messages measured for the first time.
    pub newly_measured: usize,
}

impl RenderOutcome {
    pub fn heights_changed(&self) -> bool {
        self.changed > 0
    }
}

/// Materialize `window` and reconcile measured heights into the cache.
///
/// The offset table is left as is; a caller seeing
/// [`RenderOutcome::heights_changed`] schedules the recompute.
pub fn render<S: RenderSurface + ?Sized>(
    model: &mut OffsetModel,
    window: VisibleWindow,
    scroll_top: u32,
    surface: &mut S,
) -> RenderOutcome {
    let plan = RenderPlan::new(model, window, scroll_top);
    let measured = surface.materialize(&plan, &model.messages()[plan.indices()]);

    let ids: Vec<_> = model.messages()[plan.indices()]
        .iter()
        .map(|m| m.id.clone())
        .collect();
    let mut changed = 0;
    let mut newly_measured = 0;
    for (id, height) in ids.iter().zip(measured) {
        let first_time = !model.is_measured(id);
        if model.record_height(id, height) {
            changed += 1;
            if first_time {
                newly_measured += 1;
            }
        }
    }

    RenderOutcome {
        plan,
        changed,
        newly_measured,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedSurface;
    use pretty_assertions::assert_eq;
    use sessionlens_core::testing;

    fn model(count: usize) -> OffsetModel {
        let mut model = OffsetModel::new(80, 16);
        model.set_sequence(testing::messages(count));
        model
    }

    #[test]
    fn spacers_reproduce_full_geometry() {
        let model = model(10);
        let plan = RenderPlan::new(&model, VisibleWindow::new(3, 6), 0);
        // 3 items above, 4 below; each takes 96 including its gap.
        assert_eq!(plan.leading_spacer, 288);
        assert_eq!(plan.trailing_spacer, 4 * 96 - 16);
        let drawn: u32 = (3..6).map(|i| model.height(i) + 16).sum();
        assert_eq!(
            plan.leading_spacer + drawn + plan.trailing_spacer,
            model.total_height()
        );
    }

    #[test]
    fn trailing_spacer_is_zero_at_the_end() {
        let model = model(3);
        let plan = RenderPlan::new(&model, VisibleWindow::new(0, 3), 0);
        assert_eq!(plan.leading_spacer, 0);
        assert_eq!(plan.trailing_spacer, 0);
    }

    #[test]
    fn out_of_range_window_is_clamped() {
        let model = model(3);
        let plan = RenderPlan::new(&model, VisibleWindow::new(1, 9), 0);
        assert_eq!(plan.window, VisibleWindow::new(1, 3));
    }

    #[test]
    fn render_records_heights_without_recomputing() {
        let mut model = model(3);
        let mut surface = FixedSurface::uniform(40);

        let outcome = render(&mut model, VisibleWindow::new(0, 2), 0, &mut surface);

        assert_eq!(outcome.changed, 2);
        assert_eq!(outcome.newly_measured, 2);
        assert_eq!(surface.rendered, vec![VisibleWindow::new(0, 2)]);
        assert_eq!(model.offsets(), &[0, 96, 192]);
        assert_eq!(model.recompute(), 40 + 16 + 40 + 16 + 80);
    }

    #[test]
    fn rerendering_unchanged_range_is_idempotent() {
        let mut model = model(5);
        let mut surface = FixedSurface::uniform(7);
        render(&mut model, VisibleWindow::new(1, 4), 0, &mut surface);
        model.recompute();

        let outcome = render(&mut model, VisibleWindow::new(1, 4), 0, &mut surface);
        assert!(!outcome.heights_changed());
        assert_eq!(outcome.newly_measured, 0);
    }

    #[test]
    fn remeasured_height_counts_as_change_but_not_as_new() {
        let mut model = model(2);
        let mut surface = FixedSurface::uniform(7);
        render(&mut model, VisibleWindow::new(0, 2), 0, &mut surface);

        surface.set("m1", 9);
        let outcome = render(&mut model, VisibleWindow::new(0, 2), 0, &mut surface);
        assert_eq!(outcome.changed, 1);
        assert_eq!(outcome.newly_measured, 0);
    }
}
