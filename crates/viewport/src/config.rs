use std::time::Duration;

use sessionlens_runtime_config::ViewportSettings;

/// Engine tuning. Lengths are in terminal rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportConfig {
    /// Height assumed for any message that has not been measured yet.
    pub estimated_height: u32,
    /// Fixed gap between consecutive messages.
    pub gap: u32,
    /// Rows resolved above and below the viewport.
    pub overscan: u32,
    pub recalc_debounce: Duration,
    /// Relative change of the total height (in percent) that forces a minimap repaint.
    pub repaint_threshold_pct: u32,
    /// Newly measured messages since the last paint that force a minimap repaint.
    pub repaint_item_threshold: usize,
    pub minimap_min_block: f64,
    pub minimap_settle: Duration,
    pub minimap_pixel_ratio: u32,
    /// Rows kept above a selected message when scrolling it into view.
    pub selection_margin: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self::from(&ViewportSettings::default())
    }
}

impl From<&ViewportSettings> for ViewportConfig {
    fn from(settings: &ViewportSettings) -> Self {
        Self {
            estimated_height: settings.estimated_height,
            gap: settings.gap,
            overscan: settings.overscan,
            recalc_debounce: Duration::from_millis(settings.recalc_debounce_ms),
            repaint_threshold_pct: settings.repaint_threshold_pct,
            repaint_item_threshold: settings.repaint_item_threshold,
            minimap_min_block: settings.minimap_min_block.max(0.0),
            minimap_settle: Duration::from_millis(settings.minimap_settle_ms),
            minimap_pixel_ratio: settings.minimap_pixel_ratio.max(1),
            selection_margin: settings.selection_margin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_convert_to_durations_and_sane_ratio() {
        let settings = ViewportSettings {
            recalc_debounce_ms: 250,
            minimap_pixel_ratio: 0,
            ..ViewportSettings::default()
        };
        let config = ViewportConfig::from(&settings);
        assert_eq!(config.recalc_debounce, Duration::from_millis(250));
        assert_eq!(config.minimap_pixel_ratio, 1);
        assert_eq!(config.estimated_height, settings.estimated_height);
    }
}
