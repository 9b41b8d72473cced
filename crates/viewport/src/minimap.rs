use sessionlens_core::Role;

use crate::offsets::OffsetModel;

/// Viewport indicator position in logical minimap rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapIndicator {
    pub top: f64,
    pub height: f64,
}

/// Proportional overview of the whole sequence.
///
/// Logical coordinates are minimap rows; the canvas holds `pixel_ratio`
/// device rows per logical row (2 for half-block cells) and paints in
/// device rows while callers keep working in logical ones.
#[derive(Debug, Clone)]
pub struct Minimap {
    logical_height: u32,
    pixel_ratio: u32,
    min_block: f64,
    canvas: Vec<Option<Role>>,
    indicator: Option<MinimapIndicator>,
    paints: u64,
}

impl Minimap {
    pub fn new(pixel_ratio: u32, min_block: f64) -> Self {
        Self {
            logical_height: 0,
            pixel_ratio: pixel_ratio.max(1),
            min_block,
            canvas: Vec::new(),
            indicator: None,
            paints: 0,
        }
    }

    /// Resize the overview. The canvas is cleared and needs a repaint.
    pub fn resize(&mut self, logical_height: u32) -> bool {
        if logical_height == self.logical_height {
            return false;
        }
        self.logical_height = logical_height;
        self.canvas = vec![None; self.device_height()];
        true
    }

    /// Logical rows per content row for a sequence of `total_height`.
    pub fn scale(&self, total_height: u32) -> f64 {
        f64::from(self.logical_height) / f64::from(total_height.max(1))
    }

    /// Draw one block per message, colored by role. Later messages win
    /// where blocks overlap.
    pub fn paint(&mut self, model: &OffsetModel) {
        let ratio = f64::from(self.pixel_ratio);
        let device_height = self.device_height();
        let scale = self.scale(model.total_height());
        self.canvas.clear();
        self.canvas.resize(device_height, None);
        self.paints += 1;
        if device_height == 0 {
            return;
        }

        for (index, message) in model.messages().iter().enumerate() {
            let top = f64::from(model.offset(index)) * scale;
            let height = (f64::from(model.height(index)) * scale).max(self.min_block);
            let first = ((top * ratio).floor() as usize).min(device_height - 1);
            let last = (((top + height) * ratio).ceil() as usize).clamp(first + 1, device_height);
            for pixel in &mut self.canvas[first..last] {
                *pixel = Some(message.role);
            }
        }
    }

    /// Place the indicator for the current scroll state. Independent of
    /// whether the blocks were repainted.
    pub fn update_viewport_indicator(
        &mut self,
        scroll_top: u32,
        viewport_height: u32,
        total_height: u32,
    ) {
        let scale = self.scale(total_height);
        self.indicator = Some(MinimapIndicator {
            top: f64::from(scroll_top) * scale,
            height: f64::from(viewport_height) * scale,
        });
    }

    /// Scroll offset that centers the viewport on a click at logical row `y`.
    pub fn click_target(&self, y: f64, viewport_height: u32, total_height: u32) -> u32 {
        let scale = self.scale(total_height);
        let target = y / scale - f64::from(viewport_height) / 2.0;
        target.max(0.0).round() as u32
    }

    pub fn pixel_ratio(&self) -> u32 {
        self.pixel_ratio
    }

    pub fn device_height(&self) -> usize {
        self.logical_height as usize * self.pixel_ratio as usize
    }

    /// Painted device rows, top to bottom.
    pub fn canvas(&self) -> &[Option<Role>] {
        &self.canvas
    }

    pub fn indicator(&self) -> Option<MinimapIndicator> {
        self.indicator
    }

    /// Number of full repaints so far.
    pub fn paint_count(&self) -> u64 {
        self.paints
    }
}
