use std::collections::HashMap;

use sessionlens_core::Message;

use crate::render::{RenderPlan, RenderSurface};
use crate::window::VisibleWindow;

/// Surface that "measures" synthetic heights and records what it was asked to draw.
#[derive(Debug, Default)]
pub struct FixedSurface {
    pub default_height: u32,
    pub heights: HashMap<String, u32>,
    pub rendered: Vec<VisibleWindow>,
}

impl FixedSurface {
    pub fn uniform(height: u32) -> Self {
        Self {
            default_height: height,
            ..Self::default()
        }
    }

    pub fn set(&mut self, id: &str, height: u32) {
        self.heights.insert(id.to_string(), height);
    }
}

impl RenderSurface for FixedSurface {
    fn materialize(&mut self, plan: &RenderPlan, messages: &[Message]) -> Vec<u32> {
        self.rendered.push(plan.window);
        messages
            .iter()
            .map(|m| {
                self.heights
                    .get(m.id.as_str())
                    .copied()
                    .unwrap_or(self.default_height)
            })
            .collect()
    }
}
