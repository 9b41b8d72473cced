use std::time::Instant;

use sessionlens_core::Message;
use tracing::debug;

use crate::config::ViewportConfig;
use crate::minimap::Minimap;
use crate::offsets::OffsetModel;
use crate::render::{RenderOutcome, RenderSurface, render};
use crate::schedule::{RecalcScheduler, RepaintGate};
use crate::window::{VisibleWindow, resolve};

/// One virtual-scrolling engine instance: the offset model, the resolved
/// window, the recalculation scheduler and the minimap, driven frame by frame.
///
/// Scroll input is throttled to one application per [`Viewport::frame`];
/// a burst of scroll events collapses to the latest position.
#[derive(Debug, Clone)]
pub struct Viewport {
    config: ViewportConfig,
    model: OffsetModel,
    scheduler: RecalcScheduler,
    gate: RepaintGate,
    minimap: Minimap,
    generation: u64,
    scroll_top: u32,
    viewport_height: u32,
    pending_scroll: Option<u32>,
    window: VisibleWindow,
    window_dirty: bool,
    /// Total height last handed to the surface for its scroll geometry.
    content_height: u32,
    interaction_until: Option<Instant>,
}

impl Viewport {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            model: OffsetModel::new(config.estimated_height, config.gap),
            scheduler: RecalcScheduler::new(config.recalc_debounce),
            gate: RepaintGate::new(config.repaint_threshold_pct, config.repaint_item_threshold),
            minimap: Minimap::new(config.minimap_pixel_ratio, config.minimap_min_block),
            config,
            generation: 0,
            scroll_top: 0,
            viewport_height: 0,
            pending_scroll: None,
            window: VisibleWindow::default(),
            window_dirty: true,
            content_height: 0,
            interaction_until: None,
        }
    }

    // ── Sequence lifecycle ────────────────────────────────────────────────

    /// Reset everything for a new sequence. Returns the new generation;
    /// work raised under older generations becomes a no-op.
    pub fn load(&mut self, messages: Vec<Message>) -> u64 {
        self.generation += 1;
        self.model.set_sequence(messages);
        self.scroll_top = 0;
        self.pending_scroll = None;
        self.interaction_until = None;
        self.gate.reset();
        self.sequence_changed();
        debug!(
            generation = self.generation,
            messages = self.model.len(),
            total = self.content_height,
            "viewport loaded"
        );
        self.generation
    }

    /// Apply a newer snapshot of the same sequence, keeping measured heights.
    pub fn refresh(&mut self, messages: Vec<Message>) {
        self.model.replace_sequence(messages);
        self.sequence_changed();
    }

    /// Reverse the order. The height cache is invalidated and offsets are
    /// rebuilt before the next render.
    pub fn reverse_order(&mut self) {
        self.model.reverse();
        self.sequence_changed();
    }

    /// A layout-affecting mode changed; cached heights are meaningless now.
    pub fn invalidate_layout(&mut self) {
        self.model.invalidate_heights();
        self.sequence_changed();
    }

    fn sequence_changed(&mut self) {
        self.content_height = self.model.total_height();
        self.scroll_top = self.clamp_scroll(self.scroll_top);
        self.window_dirty = true;
        self.repaint_minimap();
        self.update_indicator();
    }

    // ── Scroll input ──────────────────────────────────────────────────────

    /// Queue a scroll position; only the latest one before a frame is applied.
    pub fn on_scroll(&mut self, scroll_top: u32) {
        self.pending_scroll = Some(scroll_top);
    }

    pub fn scroll_by(&mut self, delta: i64) {
        let current = i64::from(self.effective_scroll_top());
        let target = (current + delta).clamp(0, i64::from(u32::MAX)) as u32;
        self.on_scroll(target);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.on_scroll(self.max_scroll());
    }

    /// Scroll position after pending input is applied.
    pub fn effective_scroll_top(&self) -> u32 {
        self.clamp_scroll(self.pending_scroll.unwrap_or(self.scroll_top))
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        if height != self.viewport_height {
            self.viewport_height = height;
            self.scroll_top = self.clamp_scroll(self.scroll_top);
            self.window_dirty = true;
            self.update_indicator();
        }
    }

    pub fn set_minimap_height(&mut self, rows: u32) {
        if self.minimap.resize(rows) {
            self.repaint_minimap();
            self.update_indicator();
        }
    }

    fn max_scroll(&self) -> u32 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    fn clamp_scroll(&self, scroll_top: u32) -> u32 {
        scroll_top.min(self.max_scroll())
    }

    /// Whether message `index` lies entirely inside the viewport at the
    /// effective scroll position.
    pub fn is_fully_visible(&self, index: usize) -> bool {
        if index >= self.model.len() {
            return false;
        }
        let top = self.effective_scroll_top();
        let bottom = top.saturating_add(self.viewport_height);
        self.model.offset(index) >= top && self.model.bottom(index) <= bottom
    }

    pub fn is_at_bottom(&self) -> bool {
        self.effective_scroll_top() >= self.max_scroll()
    }

    // ── Minimap interaction ───────────────────────────────────────────────

    /// Jump so the viewport centers on minimap row `y`. The jump is applied
    /// at once and the next frame re-resolves the window; minimap repaints
    /// are held back until the interaction settles.
    pub fn click_minimap(&mut self, now: Instant, y: f64) -> u32 {
        let target =
            self.minimap
                .click_target(y, self.viewport_height, self.model.total_height());
        self.pending_scroll = None;
        self.scroll_top = self.clamp_scroll(target);
        self.window_dirty = true;
        self.interaction_until = Some(now + self.config.minimap_settle);
        self.update_indicator();
        self.scroll_top
    }

    pub fn interaction_active(&self, now: Instant) -> bool {
        self.interaction_until.is_some_and(|until| now < until)
    }

    // ── Frame ─────────────────────────────────────────────────────────────

    /// Advance one frame: apply pending scroll, run a due recalculation,
    /// settle minimap interaction, resolve and render the window.
    pub fn frame<S: RenderSurface + ?Sized>(
        &mut self,
        now: Instant,
        surface: &mut S,
    ) -> RenderOutcome {
        if let Some(requested) = self.pending_scroll.take() {
            let clamped = self.clamp_scroll(requested);
            if clamped != self.scroll_top {
                self.scroll_top = clamped;
                self.window_dirty = true;
                self.update_indicator();
            }
        }

        if self.scheduler.take_due(now, self.generation).is_some() {
            self.run_recalculation(now);
        }

        if self.interaction_until.is_some_and(|until| now >= until) {
            self.interaction_until = None;
            if self.gate.take_deferred() {
                debug!("applying deferred minimap repaint");
                self.repaint_minimap();
            }
        }

        if self.window_dirty {
            self.window = resolve(
                &self.model,
                self.scroll_top,
                self.viewport_height,
                self.config.overscan,
            );
            self.window_dirty = false;
        }

        let outcome = render(&mut self.model, self.window, self.scroll_top, surface);
        if outcome.heights_changed() {
            self.gate.record_measured(outcome.newly_measured);
            self.scheduler.notify(now, self.generation);
        }
        outcome
    }

    fn run_recalculation(&mut self, now: Instant) {
        let total = self.model.recompute();
        self.content_height = total;
        self.scroll_top = self.clamp_scroll(self.scroll_top);
        self.window_dirty = true;
        self.update_indicator();

        if self.gate.should_repaint(total) {
            if self.interaction_active(now) {
                debug!(total, "deferring minimap repaint during interaction");
                self.gate.defer();
            } else {
                self.repaint_minimap();
            }
        }
    }

    fn repaint_minimap(&mut self) {
        self.minimap.paint(&self.model);
        self.gate.mark_painted(self.model.total_height());
    }

    fn update_indicator(&mut self) {
        self.minimap.update_viewport_indicator(
            self.scroll_top,
            self.viewport_height,
            self.model.total_height(),
        );
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn model(&self) -> &OffsetModel {
        &self.model
    }

    pub fn minimap(&self) -> &Minimap {
        &self.minimap
    }

    pub fn window(&self) -> VisibleWindow {
        self.window
    }

    pub fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    pub fn content_height(&self) -> u32 {
        self.content_height
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn recalc_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn repaint_deferred(&self) -> bool {
        self.gate.is_deferred()
    }

    pub fn len(&self) -> usize {
        self.model.len()
    }

    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
    }
}
